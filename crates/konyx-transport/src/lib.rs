//! HTTP transport layer for the Konyx fleet API client
//!
//! Provides a trait-based transport abstraction that performs exactly one
//! HTTP round-trip per call and hands the raw response back. Status codes are
//! never judged here; the `konyx` crate turns responses into typed results.

#![deny(unsafe_code)]
#![warn(missing_docs)]
//! # Architecture
//!
//! - **Transport trait**: generic interface for any transport implementation
//! - **HTTP transport**: reqwest client with a cookie store, so session
//!   cookies set by the server are sent back on later requests
//! - **Error handling**: network-level failures only
//!
//! # Usage
//!
//! ```ignore
//! use konyx_transport::{HttpRequest, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new(http::Method::GET, "http://localhost:8080/health");
//! let response = transport.send_http(request).await?;
//! ```

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use crate::http::{HttpTransport, HttpTransportConfig};
pub use traits::{HttpRequest, HttpResponse, Transport};
