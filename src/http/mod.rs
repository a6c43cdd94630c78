//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum serve, graceful shutdown)
//!     → request.rs (x-request-id assigned and propagated)
//!     → trace / timeout / body limit layers
//!     → registered endpoint routes
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
