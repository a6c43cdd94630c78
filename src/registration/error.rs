//! Registration errors.

use thiserror::Error;

use crate::services::ResolveError;

/// Errors that abort endpoint registration at startup.
///
/// When one is returned, none of the endpoint's routes have been added.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The configuration-phase instance could not be constructed.
    #[error("failed to resolve endpoint `{endpoint}`: {source}")]
    Resolve {
        endpoint: &'static str,
        #[source]
        source: ResolveError,
    },

    /// A declared pattern is unusable by the route table.
    #[error("endpoint `{endpoint}` declared invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        endpoint: &'static str,
        pattern: String,
        reason: &'static str,
    },

    /// A method route was declared without any method.
    #[error("endpoint `{endpoint}` declared route `{pattern}` without any HTTP method")]
    NoMethods {
        endpoint: &'static str,
        pattern: String,
    },

    /// A method route names something that is not a standard HTTP method.
    #[error("endpoint `{endpoint}` declared route `{pattern}` with unknown HTTP method `{method}`")]
    UnknownMethod {
        endpoint: &'static str,
        pattern: String,
        method: String,
    },
}
