//! Chained registration API.

use axum::extract::FromRequest;
use axum::http::Method;
use axum::routing::MethodRouter;
use axum::Router;

use super::engine::{register_endpoint, register_route};
use super::error::RegistrationError;
use crate::endpoint::{Configure, Endpoint, RouteDeclaration};
use crate::services::DependencySource;

/// An axum route table paired with the dependency source its endpoints
/// resolve from.
///
/// The table stays private until [`into_router`](EndpointRouter::into_router)
/// binds it to that same source.
///
/// ```ignore
/// let app = EndpointRouter::new(state)
///     .endpoint::<GetUsersEndpoint, EmptyParameters>()?
///     .map_get::<HealthEndpoint, EmptyParameters>("/health")?
///     .into_router();
/// ```
pub struct EndpointRouter<S> {
    router: Router<S>,
    services: S,
}

impl<S: DependencySource> EndpointRouter<S> {
    pub fn new(services: S) -> Self {
        Self {
            router: Router::new(),
            services,
        }
    }

    /// Starts from an existing route table.
    pub fn from_router(router: Router<S>, services: S) -> Self {
        Self { router, services }
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    /// Registers an endpoint at the routes it declares itself.
    pub fn endpoint<E, P>(mut self) -> Result<Self, RegistrationError>
    where
        E: Configure<S> + Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.router = register_endpoint::<E, P, S>(self.router, &self.services)?;
        Ok(self)
    }

    /// Registers an endpoint at one caller-chosen route, customizing the
    /// resulting route handle.
    pub fn map_with<E, P>(
        mut self,
        declaration: RouteDeclaration,
        customize: impl Fn(MethodRouter<S>) -> MethodRouter<S>,
    ) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.router = register_route::<E, P, S>(self.router, &self.services, &declaration, &customize)?;
        Ok(self)
    }

    /// Maps an endpoint to `pattern` for every HTTP method.
    pub fn map<E, P>(self, pattern: impl Into<String>) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        let declaration = RouteDeclaration::Route {
            pattern: pattern.into(),
        };
        self.map_with::<E, P>(declaration, |route| route)
    }

    /// Maps an endpoint to `pattern` for the given methods.
    pub fn map_methods<E, P>(
        self,
        pattern: impl Into<String>,
        methods: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        let declaration = RouteDeclaration::MethodRoute {
            pattern: pattern.into(),
            methods: methods
                .into_iter()
                .map(|m| m.as_ref().to_string())
                .collect(),
        };
        self.map_with::<E, P>(declaration, |route| route)
    }

    pub fn map_get<E, P>(self, pattern: impl Into<String>) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.map_methods::<E, P>(pattern, [Method::GET])
    }

    pub fn map_post<E, P>(self, pattern: impl Into<String>) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.map_methods::<E, P>(pattern, [Method::POST])
    }

    pub fn map_put<E, P>(self, pattern: impl Into<String>) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.map_methods::<E, P>(pattern, [Method::PUT])
    }

    pub fn map_delete<E, P>(self, pattern: impl Into<String>) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.map_methods::<E, P>(pattern, [Method::DELETE])
    }

    pub fn map_patch<E, P>(self, pattern: impl Into<String>) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.map_methods::<E, P>(pattern, [Method::PATCH])
    }

    /// Makes an endpoint the global fallback.
    pub fn map_fallback<E, P>(self) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        self.map_with::<E, P>(RouteDeclaration::GlobalFallback, |route| route)
    }

    /// Maps an endpoint to `pattern` with the lowest priority.
    pub fn map_fallback_at<E, P>(self, pattern: impl Into<String>) -> Result<Self, RegistrationError>
    where
        E: Endpoint<S, P>,
        P: FromRequest<S> + Send + 'static,
    {
        let declaration = RouteDeclaration::FallbackRoute {
            pattern: pattern.into(),
        };
        self.map_with::<E, P>(declaration, |route| route)
    }

    /// Merges plain axum routes into the table.
    pub fn merge(mut self, other: Router<S>) -> Self {
        self.router = self.router.merge(other);
        self
    }

    /// Finishes registration, binding the dependency source as router state.
    ///
    /// This is the only way out: a global fallback already holds this
    /// dependency source, so the table must not be given any other state.
    pub fn into_router(self) -> Router {
        self.router.with_state(self.services)
    }
}
