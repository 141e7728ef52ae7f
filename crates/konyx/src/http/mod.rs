//! HTTP request descriptors and response interpretation
//!
//! This module holds the pieces `ApiClient` composes around a
//! [`Transport`](konyx_transport::Transport): the per-call request descriptor
//! and the error-message extraction chain.

pub use message::{GENERIC_FAILURE, extract_message};
pub use request::RequestOptions;

mod message;
mod request;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
