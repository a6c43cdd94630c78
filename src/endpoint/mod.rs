//! Endpoint contract.
//!
//! # Responsibilities
//! - Define how an endpoint handles one request (`Endpoint`)
//! - Define how an endpoint declares its own routes (`Configure`)
//! - Provide the route declaration builder and stock parameter shapes
//!
//! # Design Decisions
//! - `handle` takes `self` by value: every request gets its own instance,
//!   built from the request scope, and it is gone once the request is answered
//! - The parameter shape is a trait parameter, so one endpoint type can serve
//!   several shapes
//! - `Configure` is a separate capability. Endpoints without it are mapped to
//!   a route chosen by the caller

pub mod config;
pub mod parameters;

use std::future::Future;

use axum::response::IntoResponse;
use tokio_util::sync::CancellationToken;

use crate::services::Resolve;

pub use config::{Customizer, EndpointConfig, RouteDeclaration};
pub use parameters::{ContextParameters, EmptyParameters};

/// Handles a request whose parameters have been bound to `P`.
pub trait Endpoint<S, P>: Resolve<S> + Send + 'static {
    /// What the endpoint answers with.
    type Output: IntoResponse;

    /// Handles one request.
    ///
    /// `cancellation` fires when the host abandons the request, for example
    /// on client disconnect or timeout. Work spawned on behalf of the request
    /// should stop when it does.
    fn handle(
        self,
        parameters: P,
        cancellation: CancellationToken,
    ) -> impl Future<Output = Self::Output> + Send;
}

/// Declares the routes an endpoint answers.
///
/// Called exactly once per registration, on an instance resolved from a
/// registration scope. Implementations only record intent on `config`.
pub trait Configure<S> {
    fn configure(&self, config: &mut EndpointConfig<S>);
}
