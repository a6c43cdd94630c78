//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Init logging → Register endpoints → Bind listener → Serve
//!
//! Shutdown:
//!     Ctrl+C or Shutdown::trigger → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any registration error aborts startup
//! - Listeners start last (traffic only when every route is in place)

pub mod shutdown;

pub use shutdown::{shutdown_signal, Shutdown};
