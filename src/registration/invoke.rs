//! Per-request invocation.
//!
//! Every route an endpoint registers points at the same handler function:
//! build a fresh endpoint from the request scope, bind its parameters, run it.

use std::any::type_name;

use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio_util::sync::CancellationToken;

use crate::endpoint::Endpoint;
use crate::http::request::RequestIdExt;
use crate::services::{DependencySource, Scope};

pub(crate) async fn invoke<E, P, S>(State(services): State<S>, request: Request) -> Response
where
    S: DependencySource,
    E: Endpoint<S, P>,
    P: FromRequest<S> + Send + 'static,
{
    let endpoint = {
        let scope = Scope::for_request(&services, request.extensions());
        match E::resolve(&scope) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                tracing::error!(
                    endpoint = type_name::<E>(),
                    request_id = request.request_id().unwrap_or("unknown"),
                    path = %request.uri().path(),
                    error = %e,
                    "Failed to resolve endpoint for request"
                );
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    };

    let parameters = match P::from_request(request, &services).await {
        Ok(parameters) => parameters,
        Err(rejection) => return rejection.into_response(),
    };

    // Dropping the request future cancels the token.
    let cancellation = CancellationToken::new();
    let _guard = cancellation.clone().drop_guard();

    endpoint.handle(parameters, cancellation).await.into_response()
}
