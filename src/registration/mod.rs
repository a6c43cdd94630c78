//! Registration subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (once per endpoint type):
//!     detached scope → configuration-phase instance → Configure::configure
//!     → EndpointConfig (declarations + customizer)
//!     → validate all declarations
//!     → one axum route per declaration, all pointing at invoke::<E, P, S>
//!
//! Per request:
//!     invoke → request scope → fresh endpoint instance
//!            → FromRequest binds P (rejections answered directly)
//!            → Endpoint::handle(P, cancellation) → IntoResponse
//! ```

pub mod engine;
pub mod error;
mod invoke;
pub mod router;

pub use engine::{register_endpoint, register_route};
pub use error::RegistrationError;
pub use router::EndpointRouter;
