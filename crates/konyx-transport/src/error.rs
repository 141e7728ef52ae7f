//! Transport error types

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised when no HTTP response could be obtained.
///
/// A response with an error status is not a transport error; it comes back
/// as an ordinary [`HttpResponse`](crate::HttpResponse).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be completed (protocol error, body read failure)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Connection could not be established (DNS, refused, TLS)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The configured timeout elapsed
    #[error("Timeout")]
    Timeout,

    /// The request URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The underlying client could not be built
    #[error("Client build error: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}
