//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration engine, invocation handler, HTTP server:
//!     → tracing events (endpoint, pattern, request_id fields)
//!     → logging.rs subscriber (fmt layer, EnvFilter)
//!
//! Per request:
//!     → tower-http TraceLayer span
//! ```

pub mod logging;

pub use logging::init_logging;
