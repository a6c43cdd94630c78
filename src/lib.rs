//! Structured endpoint registration for axum.
//!
//! Endpoints are stateless, dependency-injected types instead of inline
//! closures. Each one declares its own routes once at startup and is built
//! afresh for every request it answers.
//!
//! ```text
//!   startup                                   per request
//!   ───────                                   ───────────
//!   DependencySource ─▶ Scope::detached        Scope::for_request ─▶ E::resolve
//!          │                 │                         ▲                 │
//!          │                 ▼                         │                 ▼
//!          │          E::configure(config)        invoke::<E, P, S>   P::from_request
//!          │                 │                         ▲                 │
//!          ▼                 ▼                         │                 ▼
//!   EndpointRouter ◀── routes / fallbacks ─────────────┘          E::handle(P, cancel)
//! ```

pub mod config;
pub mod endpoint;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registration;
pub mod services;

pub use config::ServerConfig;
pub use endpoint::{
    Configure, ContextParameters, EmptyParameters, Endpoint, EndpointConfig, RouteDeclaration,
};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registration::{register_endpoint, EndpointRouter, RegistrationError};
pub use services::{DependencySource, Resolve, ResolveError, Scope, ScopeKind};
pub use tokio_util::sync::CancellationToken;
