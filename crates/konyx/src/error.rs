//! Error types for the Konyx client
//!
//! Two layers: [`ApiError`] is the normalized shape of any non-2xx response,
//! and [`Error`] is everything a call can fail with, including transport and
//! decoding failures that never produced an `ApiError`.

use konyx_transport::TransportError;
use thiserror::Error;

/// Result type alias for operations that can fail with a Konyx client error.
pub type Result<T> = std::result::Result<T, Error>;

/// A non-2xx response from the API.
///
/// `status` is always the HTTP status the server sent. `message` is
/// best-effort, taken from the response body or the status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The server rejected the credentials (401).
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// The caller lacks permission (403).
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// The resource does not exist (404).
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// The backend feature is disabled (501), e.g. telemetry storage is off.
    pub fn is_not_implemented(&self) -> bool {
        self.status == 501
    }

    /// A device command timed out waiting for its acknowledgement (504).
    pub fn is_gateway_timeout(&self) -> bool {
        self.status == 504
    }

    /// Server-side failure (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Main error type for the Konyx client.
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered with a non-2xx status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No response was received (DNS, connection refused, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response body was not valid JSON for the expected type.
    #[error("Failed to parse API response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value for '{0}'")]
    InvalidHeaderValue(String),

    /// Invalid base URL or request path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The session holds no access token.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Errors raised by caller-supplied code, such as a custom refresh procedure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => Some(api.status),
            _ => None,
        }
    }

    /// The normalized API error, if the server answered with a non-2xx status.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }

    /// True only for an API response with status exactly 401.
    pub fn is_unauthorized(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_unauthorized)
    }

    /// True only for an API response with status 404.
    pub fn is_not_found(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(400, "bad input");
        assert_eq!(err.to_string(), "bad input (status 400)");
        assert_eq!(
            Error::from(err).to_string(),
            "API error: bad input (status 400)"
        );
    }

    #[test]
    fn test_status_predicates() {
        assert!(ApiError::new(401, "").is_unauthorized());
        assert!(ApiError::new(403, "").is_forbidden());
        assert!(ApiError::new(404, "").is_not_found());
        assert!(ApiError::new(501, "").is_not_implemented());
        assert!(ApiError::new(504, "").is_gateway_timeout());
        assert!(ApiError::new(503, "").is_server_error());
        assert!(!ApiError::new(499, "").is_server_error());
    }

    #[test]
    fn test_error_status() {
        assert_eq!(Error::from(ApiError::new(404, "device not found")).status(), Some(404));
        assert_eq!(Error::from(TransportError::Timeout).status(), None);
        assert_eq!(Error::NotAuthenticated.status(), None);
    }

    #[test]
    fn test_is_unauthorized_requires_api_401() {
        assert!(Error::from(ApiError::new(401, "unauthorized")).is_unauthorized());
        assert!(!Error::from(ApiError::new(403, "forbidden")).is_unauthorized());
        assert!(!Error::NotAuthenticated.is_unauthorized());
        assert!(!Error::from(TransportError::Connection("refused".into())).is_unauthorized());
    }

    #[test]
    fn test_other_wraps_anyhow() {
        let err = Error::from(anyhow::anyhow!("keychain locked"));
        assert_eq!(err.to_string(), "keychain locked");
        assert!(err.status().is_none());
    }
}
