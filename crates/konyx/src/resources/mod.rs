//! API resource endpoints
//!
//! Resources are grouped the way the server groups its routes. [`Auth`]
//! talks to the account endpoints directly; the fleet resources go through a
//! [`Session`](crate::Session) so every call carries the current access token
//! and refreshes it on a 401.

pub mod auth;
pub mod commands;
pub mod devices;
pub mod telemetry;

pub use auth::Auth;
pub use commands::{Commands, ack_from_error};
pub use devices::Devices;
pub use telemetry::Telemetry;

use crate::client::ApiClient;

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the client.
    fn client(&self) -> &ApiClient;
}

/// Build `/{prefix}/{segment}{suffix}` with `segment` percent-encoded as a
/// single path segment.
pub(crate) fn path_with_segment(prefix: &str, segment: &str, suffix: &str) -> crate::Result<String> {
    let mut url = url::Url::parse("http://path.invalid/")
        .map_err(|e| crate::Error::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| crate::Error::InvalidUrl(prefix.to_string()))?
        .clear()
        .extend(prefix.split('/').filter(|s| !s.is_empty()))
        .push(segment)
        .extend(suffix.split('/').filter(|s| !s.is_empty()));
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("KNY-AX91-001", "/api/v1/devices/KNY-AX91-001/telemetry")]
    #[case("a/b", "/api/v1/devices/a%2Fb/telemetry")]
    #[case("rack 7", "/api/v1/devices/rack%207/telemetry")]
    #[case("x?y#z", "/api/v1/devices/x%3Fy%23z/telemetry")]
    fn test_segment_is_encoded(#[case] device_id: &str, #[case] expected: &str) {
        assert_eq!(
            path_with_segment("/api/v1/devices", device_id, "/telemetry").unwrap(),
            expected
        );
    }

    #[test]
    fn test_segment_without_suffix() {
        assert_eq!(
            path_with_segment("/api/v1/devices", "d1", "").unwrap(),
            "/api/v1/devices/d1"
        );
    }
}
