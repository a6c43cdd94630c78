//! Walkthrough server.
//!
//! A small user directory served through structured endpoints: two
//! self-configuring endpoints sharing a `UserService`, a health check mapped
//! by the caller, and a global fallback.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequest, FromRequestParts, Path, Request};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use clap::Parser;
use serde::Serialize;
use tokio::net::TcpListener;

use simple_endpoints::config::load_config;
use simple_endpoints::observability::init_logging;
use simple_endpoints::{
    CancellationToken, Configure, ContextParameters, DependencySource, EmptyParameters, Endpoint,
    EndpointConfig, EndpointRouter, HttpServer, Resolve, ResolveError, Scope, ServerConfig,
    Shutdown,
};

#[derive(Parser)]
#[command(name = "simple-endpoints")]
#[command(about = "Walkthrough server for structured endpoints", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct User {
    id: u32,
    username: String,
}

/// Stand-in for a real user store.
struct UserService {
    users: Vec<User>,
}

impl UserService {
    fn new() -> Self {
        Self {
            users: vec![
                User { id: 0, username: "John Doe".into() },
                User { id: 1, username: "Sam Smith".into() },
            ],
        }
    }

    fn users(&self) -> &[User] {
        &self.users
    }

    fn user(&self, id: u32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

#[derive(Clone)]
struct AppState {
    users: Arc<UserService>,
}

impl DependencySource for AppState {}

impl FromRef<AppState> for Arc<UserService> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

struct GetUsersEndpoint {
    users: Arc<UserService>,
}

impl Resolve<AppState> for GetUsersEndpoint {
    fn resolve(scope: &Scope<'_, AppState>) -> Result<Self, ResolveError> {
        Ok(Self { users: scope.service() })
    }
}

impl Configure<AppState> for GetUsersEndpoint {
    fn configure(&self, config: &mut EndpointConfig<AppState>) {
        config.map_methods("/users", [Method::GET]);
    }
}

impl Endpoint<AppState, EmptyParameters> for GetUsersEndpoint {
    type Output = Json<Vec<User>>;

    async fn handle(self, _: EmptyParameters, _: CancellationToken) -> Self::Output {
        Json(self.users.users().to_vec())
    }
}

struct GetUserParameters {
    user_id: u32,
}

impl<S> FromRequest<S> for GetUserParameters
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, _) = req.into_parts();
        let Path(user_id) = Path::<u32>::from_request_parts(&mut parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self { user_id })
    }
}

struct GetUserEndpoint {
    users: Arc<UserService>,
}

impl Resolve<AppState> for GetUserEndpoint {
    fn resolve(scope: &Scope<'_, AppState>) -> Result<Self, ResolveError> {
        Ok(Self { users: scope.service() })
    }
}

impl Configure<AppState> for GetUserEndpoint {
    fn configure(&self, config: &mut EndpointConfig<AppState>) {
        config.map_methods("/users/{user_id}", [Method::GET]);
    }
}

impl Endpoint<AppState, GetUserParameters> for GetUserEndpoint {
    type Output = Response;

    async fn handle(self, parameters: GetUserParameters, _: CancellationToken) -> Response {
        match self.users.user(parameters.user_id) {
            Some(user) => Json(user.clone()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

#[derive(Default)]
struct HealthEndpoint;

impl<S: DependencySource> Endpoint<S, EmptyParameters> for HealthEndpoint {
    type Output = &'static str;

    async fn handle(self, _: EmptyParameters, _: CancellationToken) -> Self::Output {
        "ok"
    }
}

#[derive(Default)]
struct FallbackEndpoint;

impl<S: DependencySource> Configure<S> for FallbackEndpoint {
    fn configure(&self, config: &mut EndpointConfig<S>) {
        config.map_fallback();
    }
}

impl<S: DependencySource> Endpoint<S, ContextParameters> for FallbackEndpoint {
    type Output = StatusCode;

    async fn handle(self, parameters: ContextParameters, _: CancellationToken) -> StatusCode {
        tracing::debug!(
            method = %parameters.method(),
            path = %parameters.uri().path(),
            request_id = parameters.request_id().unwrap_or("unknown"),
            "No endpoint matched"
        );
        StatusCode::NO_CONTENT
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let state = AppState {
        users: Arc::new(UserService::new()),
    };

    let endpoints = EndpointRouter::new(state)
        .endpoint::<GetUsersEndpoint, EmptyParameters>()?
        .endpoint::<GetUserEndpoint, GetUserParameters>()?
        .endpoint::<FallbackEndpoint, ContextParameters>()?
        .map_get::<HealthEndpoint, EmptyParameters>("/health")?
        .into_router();

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();

    HttpServer::new(config, endpoints)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
