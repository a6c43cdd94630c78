//! Endpoint registration.
//!
//! # Responsibilities
//! - Resolve a configuration-phase instance and collect its declarations
//! - Validate every declaration before the route table is touched
//! - Attach the shared invocation handler once per declaration
//! - Apply the endpoint's customization hook to every route handle
//!
//! # Design Decisions
//! - All-or-nothing: a bad declaration fails the whole endpoint
//! - No deduplication: registering an endpoint twice adds its routes twice,
//!   conflicts are reported by the route table itself
//! - Plain routes, method routes, global fallback, pattern fallbacks are
//!   registered in that order
//! - Only pattern fallbacks use a route's method-level fallback, so they can
//!   share a path with plain and method routes

use std::any::type_name;

use axum::extract::FromRequest;
use axum::http::Method;
use axum::routing::{any, on, MethodFilter, MethodRouter};
use axum::Router;

use super::error::RegistrationError;
use super::invoke::invoke;
use crate::endpoint::{Configure, Endpoint, EndpointConfig, RouteDeclaration};
use crate::services::{DependencySource, Scope};

/// Methods a plain route answers. Claimed explicitly rather than through the
/// method-level fallback, which stays free for a pattern fallback on the same
/// path.
const STANDARD_METHODS: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::HEAD)
    .or(MethodFilter::OPTIONS)
    .or(MethodFilter::TRACE)
    .or(MethodFilter::CONNECT);

/// A declaration that passed validation.
#[derive(Debug)]
enum PlannedRoute<'a> {
    Any(&'a str),
    Methods(&'a str, MethodFilter, &'a [String]),
    GlobalFallback,
    Fallback(&'a str),
}

/// Registers every route declared by `E` on `router`.
///
/// A single instance of `E` is resolved from a detached scope of `services`
/// to run [`Configure::configure`]; each request afterwards builds its own
/// instance from its own scope.
pub fn register_endpoint<E, P, S>(
    router: Router<S>,
    services: &S,
) -> Result<Router<S>, RegistrationError>
where
    S: DependencySource,
    E: Configure<S> + Endpoint<S, P>,
    P: FromRequest<S> + Send + 'static,
{
    let endpoint = type_name::<E>();

    let config = {
        let scope = Scope::detached(services);
        let instance: E = scope
            .resolve()
            .map_err(|source| RegistrationError::Resolve { endpoint, source })?;

        let mut config = EndpointConfig::new();
        instance.configure(&mut config);
        config
    };

    let planned = config
        .declarations()
        .into_iter()
        .map(|declaration| plan(endpoint, declaration))
        .collect::<Result<Vec<_>, _>>()?;

    if planned.is_empty() {
        tracing::warn!(endpoint, "Endpoint declared no routes");
    }

    let count = planned.len();
    let customize = |route: MethodRouter<S>| config.apply_customizer(route);
    let router = planned.into_iter().fold(router, |router, route| {
        attach::<E, P, S>(router, services, endpoint, route, &customize)
    });

    tracing::info!(endpoint, routes = count, "Endpoint registered");
    Ok(router)
}

/// Registers `E` at a single route chosen by the caller.
///
/// Used for endpoints that do not declare their own routes.
pub fn register_route<E, P, S>(
    router: Router<S>,
    services: &S,
    declaration: &RouteDeclaration,
    customize: &dyn Fn(MethodRouter<S>) -> MethodRouter<S>,
) -> Result<Router<S>, RegistrationError>
where
    S: DependencySource,
    E: Endpoint<S, P>,
    P: FromRequest<S> + Send + 'static,
{
    let endpoint = type_name::<E>();
    let route = plan(endpoint, declaration)?;

    Ok(attach::<E, P, S>(router, services, endpoint, route, customize))
}

fn plan<'a>(
    endpoint: &'static str,
    declaration: &'a RouteDeclaration,
) -> Result<PlannedRoute<'a>, RegistrationError> {
    match declaration {
        RouteDeclaration::Route { pattern } => {
            validate_pattern(endpoint, pattern)?;
            Ok(PlannedRoute::Any(pattern))
        }
        RouteDeclaration::MethodRoute { pattern, methods } => {
            validate_pattern(endpoint, pattern)?;
            let filter = method_filter(endpoint, pattern, methods)?;
            Ok(PlannedRoute::Methods(pattern, filter, methods))
        }
        RouteDeclaration::GlobalFallback => Ok(PlannedRoute::GlobalFallback),
        RouteDeclaration::FallbackRoute { pattern } => {
            validate_pattern(endpoint, pattern)?;
            Ok(PlannedRoute::Fallback(pattern))
        }
    }
}

fn validate_pattern(endpoint: &'static str, pattern: &str) -> Result<(), RegistrationError> {
    let reason = if pattern.is_empty() {
        "pattern is empty"
    } else if !pattern.starts_with('/') {
        "pattern must start with `/`"
    } else {
        return Ok(());
    };

    Err(RegistrationError::InvalidPattern {
        endpoint,
        pattern: pattern.to_string(),
        reason,
    })
}

/// Folds method names into one filter, case-insensitively.
fn method_filter(
    endpoint: &'static str,
    pattern: &str,
    methods: &[String],
) -> Result<MethodFilter, RegistrationError> {
    let mut filter: Option<MethodFilter> = None;

    for name in methods {
        let parsed = Method::from_bytes(name.to_ascii_uppercase().as_bytes())
            .ok()
            .and_then(|method| MethodFilter::try_from(method).ok())
            .ok_or_else(|| RegistrationError::UnknownMethod {
                endpoint,
                pattern: pattern.to_string(),
                method: name.clone(),
            })?;

        filter = Some(match filter {
            Some(existing) => existing.or(parsed),
            None => parsed,
        });
    }

    filter.ok_or_else(|| RegistrationError::NoMethods {
        endpoint,
        pattern: pattern.to_string(),
    })
}

fn attach<E, P, S>(
    router: Router<S>,
    services: &S,
    endpoint: &'static str,
    route: PlannedRoute<'_>,
    customize: &dyn Fn(MethodRouter<S>) -> MethodRouter<S>,
) -> Router<S>
where
    S: DependencySource,
    E: Endpoint<S, P>,
    P: FromRequest<S> + Send + 'static,
{
    match route {
        PlannedRoute::Any(pattern) => {
            tracing::debug!(endpoint, pattern, "Registering route");
            router.route(pattern, customize(on(STANDARD_METHODS, invoke::<E, P, S>)))
        }
        PlannedRoute::Methods(pattern, filter, methods) => {
            tracing::debug!(endpoint, pattern, ?methods, "Registering method route");
            router.route(pattern, customize(on(filter, invoke::<E, P, S>)))
        }
        PlannedRoute::GlobalFallback => {
            tracing::debug!(endpoint, "Registering global fallback");
            let fallback: MethodRouter = customize(any(invoke::<E, P, S>)).with_state(services.clone());
            router.fallback_service(fallback)
        }
        PlannedRoute::Fallback(pattern) => {
            tracing::debug!(endpoint, pattern, "Registering fallback route");
            router.route(
                pattern,
                customize(MethodRouter::new().fallback(invoke::<E, P, S>)),
            )
        }
    }
}
