//! # Konyx client
//!
//! Rust client for the Konyx IoT fleet operations API:
//! - Device registry and device detail
//! - Telemetry series queries
//! - Command dispatch with device acknowledgements
//! - Account sign-in with short-lived bearer tokens, refreshed transparently
//!   on a 401 from the refresh cookie
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use konyx::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> konyx::Result<()> {
//!     let session = Session::new(ApiClient::from_env()?);
//!     session.login("ops@konyx.io", "correct horse").await?;
//!
//!     for device in session.devices().list().await? {
//!         println!("{} online={}", device.device_id, device.is_online());
//!     }
//!
//!     let ack = session
//!         .commands()
//!         .send("KNY-AX91-001", &CommandRequest::new(CommandType::Ping))
//!         .await?;
//!     println!("ping ok={}", ack.ok);
//!     Ok(())
//! }
//! ```
//!
//! ## Lower level
//!
//! [`ApiClient::send`] performs one request; [`ApiClient::send_authorized`]
//! adds the bearer token and the refresh-once-on-401 flow, driven by
//! caller-supplied [`AuthHooks`]. [`Session`] supplies those hooks from its
//! own state.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use crate::http::{GENERIC_FAILURE, RequestOptions, extract_message};
pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, Error, Result};
pub use hooks::{AuthHooks, Authorized};
pub use session::{Session, SessionState};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod http;
pub mod observability;
pub mod resources;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use konyx_transport::{HttpRequest, HttpResponse, Transport, TransportError};
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use konyx::prelude::*;
/// ```
pub mod prelude {

    pub use crate::{
        ApiClient, ApiError, AuthHooks, Authorized, ClientConfig, Error, RequestOptions, Result,
        Session, SessionState,
        types::{
            AuthUser, CommandAck, CommandRequest, CommandType, Device, DeviceDetail,
            DeviceStatus, TelemetryQuery, TelemetrySeries,
        },
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BASE_URL, "http://localhost:8080");
        assert_eq!(GENERIC_FAILURE, "Request failed");
    }
}
