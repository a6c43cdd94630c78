//! Built-in parameter shapes.
//!
//! Anything implementing `FromRequest<S>` can be an endpoint's parameter
//! type; these two cover endpoints that need nothing from the request or
//! want the request as a whole.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{FromRequest, Request};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Method, Uri};

use crate::http::request::RequestIdExt;

/// Parameters for endpoints that read nothing from the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyParameters;

impl<S> FromRequest<S> for EmptyParameters
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(_req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(EmptyParameters)
    }
}

/// Parameters exposing the ambient request.
#[derive(Debug)]
pub struct ContextParameters {
    parts: Parts,
    body: Body,
}

impl ContextParameters {
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Extensions attached to the request by middleware.
    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Convenience lookup of a header as UTF-8 text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.parts.request_id()
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Gives back the request, body included.
    pub fn into_request(self) -> Request {
        Request::from_parts(self.parts, self.body)
    }
}

impl<S> FromRequest<S> for ContextParameters
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        Ok(ContextParameters { parts, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_parameters_expose_request() {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/context?q=1")
            .header("Test", "123")
            .body(Body::from("payload"))
            .unwrap();

        let params = ContextParameters::from_request(req, &()).await.unwrap();

        assert_eq!(params.method(), Method::DELETE);
        assert_eq!(params.uri().path(), "/context");
        assert_eq!(params.header("test"), Some("123"));
        assert_eq!(params.header("missing"), None);

        let body = axum::body::to_bytes(params.into_request().into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"payload");
    }

    #[tokio::test]
    async fn test_empty_parameters_never_reject() {
        let req = Request::builder()
            .uri("/anything")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            EmptyParameters::from_request(req, &()).await.unwrap(),
            EmptyParameters
        );
    }
}
