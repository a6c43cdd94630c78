//! Dependency resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Registration time:
//!     router state (DependencySource)
//!     → Scope::detached (seeded via populate_scope)
//!     → Resolve::resolve → configuration-phase endpoint
//!     → scope dropped
//!
//! Request time:
//!     router state + request extensions
//!     → Scope::for_request (seeded, then request values layered on top)
//!     → Resolve::resolve → request-phase endpoint
//!     → scope dropped with the request
//! ```
//!
//! # Design Decisions
//! - No container: app-wide services come from the router state via `FromRef`
//! - Request-lifetime values live in the scope's `Extensions`
//! - Construction is synchronous; async setup belongs in `handle`

pub mod scope;

use axum::http::Extensions;
use thiserror::Error;

pub use scope::{Scope, ScopeKind};

/// The router state seen as a source of injectable services.
///
/// Every resolution scope, whether opened at registration time or for an
/// incoming request, is first passed through [`populate_scope`] so that
/// request-lifetime services can be resolved in either phase.
///
/// [`populate_scope`]: DependencySource::populate_scope
pub trait DependencySource: Clone + Send + Sync + 'static {
    /// Seeds a freshly opened scope with request-lifetime services.
    fn populate_scope(&self, extensions: &mut Extensions) {
        let _ = extensions;
    }
}

impl DependencySource for () {}

/// Constructor injection for endpoints and the services they depend on.
///
/// Types with a `Default` implementation resolve to their default value and
/// need no manual implementation.
pub trait Resolve<S>: Sized {
    fn resolve(scope: &Scope<'_, S>) -> Result<Self, ResolveError>;
}

impl<S, T> Resolve<S> for T
where
    T: Default,
{
    fn resolve(_scope: &Scope<'_, S>) -> Result<Self, ResolveError> {
        Ok(T::default())
    }
}

/// Errors raised while constructing a value from a scope.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No value of the requested type is present in the scope.
    #[error("no `{type_name}` is available in the {scope} scope")]
    Missing {
        type_name: &'static str,
        scope: ScopeKind,
    },

    /// A constructor refused to build its value.
    #[error("failed to construct `{type_name}`: {reason}")]
    Construction {
        type_name: &'static str,
        reason: String,
    },
}

impl ResolveError {
    /// Construction failure for `T` with a human readable reason.
    pub fn construction<T>(reason: impl Into<String>) -> Self {
        Self::Construction {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }
}
