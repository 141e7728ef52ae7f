//! Wire types for the fleet operations API
//!
//! Field names follow the server's camelCase JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Account id
    pub id: String,
    /// Login email
    pub email: String,
}

/// Email and password for `register` and `login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    /// Login email
    pub email: &'a str,
    /// Plain-text password; only ever serialized into the request body
    pub password: &'a str,
}

/// Response of `register` and `login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// The signed-in account
    pub user: AuthUser,
    /// Short-lived bearer token
    pub access_token: String,
}

/// Response of `refresh`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New bearer token
    pub access_token: String,
}

/// Response of `me`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    /// The account owning the token
    pub user: AuthUser,
}

/// Connectivity of a device as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Device is connected
    Online,
    /// Device is disconnected or never reported
    #[default]
    Offline,
    /// A status this client does not know
    #[serde(other)]
    Unknown,
}

/// A registered device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device identifier, e.g. `KNY-AX91-001`
    pub device_id: String,
    /// Connectivity status
    #[serde(default)]
    pub status: DeviceStatus,
    /// Last contact, unix seconds
    #[serde(default)]
    pub last_seen: i64,
    /// Firmware version, if reported
    #[serde(default)]
    pub fw_version: Option<String>,
}

impl Device {
    /// Last contact as a timestamp.
    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_seen, 0)
    }

    /// Whether the device is currently online.
    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }
}

/// Runtime state snapshot reported by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Seconds since boot
    pub uptime: i64,
    /// Active uplink (`wifi`, `lte`, ...)
    pub link: String,
    /// Address on the active uplink
    pub ip: String,
}

/// Most recent telemetry sample across all metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Sample time, unix milliseconds
    pub ts: i64,
    /// Metric key to value
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl TelemetrySnapshot {
    /// Sample time as a timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.ts)
    }
}

/// Device detail: registry entry plus optional state and telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetail {
    /// Registry entry
    pub device: Device,
    /// Last runtime state, absent when telemetry storage is off
    #[serde(default)]
    pub state: Option<DeviceState>,
    /// Last telemetry sample, absent when telemetry storage is off
    #[serde(default)]
    pub last_telemetry: Option<TelemetrySnapshot>,
}

/// One point of a telemetry series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    /// Sample time, unix seconds
    pub ts: i64,
    /// Sample value
    pub value: f64,
}

/// A telemetry series for one device and metric.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySeries {
    /// Device the series belongs to
    #[serde(default)]
    pub device_id: Option<String>,
    /// Metric key
    #[serde(default)]
    pub metric: Option<String>,
    /// Points in time order
    #[serde(default)]
    pub points: Vec<TelemetryPoint>,
}

/// Parameters of a telemetry series query.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryQuery {
    /// Device to query
    pub device_id: String,
    /// Metric key, e.g. `temperature`
    pub metric: String,
    /// Range start, unix seconds
    pub from: i64,
    /// Range end, unix seconds
    pub to: i64,
    /// Maximum number of points
    pub limit: Option<u32>,
}

impl TelemetryQuery {
    /// Query `metric` of `device_id` between two instants.
    pub fn new(
        device_id: impl Into<String>,
        metric: impl Into<String>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            metric: metric.into(),
            from: from.timestamp(),
            to: to.timestamp(),
            limit: None,
        }
    }

    /// Query the `window` ending at `now`.
    pub fn last(
        device_id: impl Into<String>,
        metric: impl Into<String>,
        window: chrono::Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(device_id, metric, now - window, now)
    }

    /// Cap the number of points.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Commands a device understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Liveness check
    Ping,
    /// Restart the device
    Reboot,
    /// Publish runtime state now
    GetState,
    /// Apply a configuration payload
    ApplyCfg,
}

/// Body of a command dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    /// Command to run
    #[serde(rename = "type")]
    pub command_type: CommandType,
    /// Command parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Map<String, serde_json::Value>>,
    /// How long the server waits for the acknowledgement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl CommandRequest {
    /// A command without parameters and with the server's default timeout.
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            params: None,
            timeout_ms: None,
        }
    }

    /// Attach parameters.
    pub fn with_params(mut self, params: serde_json::Map<String, serde_json::Value>) -> Self {
        self.params = Some(params);
        self
    }

    /// Override the acknowledgement timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

/// Acknowledgement a device sent for a command.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAck {
    /// Payload schema version
    #[serde(default)]
    pub v: u32,
    /// Command id
    #[serde(default)]
    pub id: String,
    /// Device that answered
    #[serde(default)]
    pub device_id: String,
    /// Acknowledgement time, unix milliseconds
    #[serde(default)]
    pub ts: i64,
    /// Whether the command succeeded
    #[serde(default)]
    pub ok: bool,
    /// Machine-readable result code
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable result
    #[serde(default)]
    pub msg: Option<String>,
    /// Command-specific result data
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Response of a command dispatch.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SendCommandResponse {
    pub(crate) ack: CommandAck,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_device_decodes_server_shape() {
        let device: Device = serde_json::from_value(json!({
            "deviceId": "KNY-AX91-001",
            "status": "online",
            "lastSeen": 1_700_000_000,
            "fwVersion": null
        }))
        .unwrap();

        assert_eq!(device.device_id, "KNY-AX91-001");
        assert!(device.is_online());
        assert_eq!(device.fw_version, None);
        assert_eq!(device.last_seen_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let device: Device =
            serde_json::from_value(json!({"deviceId": "d", "status": "sleeping"})).unwrap();
        assert_eq!(device.status, DeviceStatus::Unknown);
    }

    #[test]
    fn test_device_detail_with_missing_parts() {
        let detail: DeviceDetail = serde_json::from_value(json!({
            "device": {"deviceId": "KNY-ZT10-404", "status": "offline", "lastSeen": 0},
            "state": null,
            "lastTelemetry": {"ts": 1_700_000_000_000_i64, "metrics": {"temperature": 21.5}}
        }))
        .unwrap();

        assert_eq!(detail.state, None);
        let telemetry = detail.last_telemetry.unwrap();
        assert_eq!(telemetry.metrics["temperature"], 21.5);
        assert_eq!(telemetry.timestamp().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_command_request_serialization() {
        let mut params = serde_json::Map::new();
        params.insert("intervalMs".to_string(), json!(5000));

        let request = CommandRequest::new(CommandType::ApplyCfg)
            .with_params(params)
            .with_timeout(std::time::Duration::from_secs(3));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "apply_cfg", "params": {"intervalMs": 5000}, "timeoutMs": 3000})
        );
        assert_eq!(
            serde_json::to_value(CommandRequest::new(CommandType::GetState)).unwrap(),
            json!({"type": "get_state"})
        );
    }

    #[test]
    fn test_command_ack_partial() {
        let ack: CommandAck = serde_json::from_value(json!({
            "v": 1, "id": "c1", "deviceId": "d1", "ts": 5, "ok": false, "code": "TIMEOUT"
        }))
        .unwrap();
        assert!(!ack.ok);
        assert_eq!(ack.code.as_deref(), Some("TIMEOUT"));
        assert_eq!(ack.msg, None);
    }

    #[test]
    fn test_telemetry_query_window() {
        let now = DateTime::from_timestamp(1_700_003_600, 0).unwrap();
        let query = TelemetryQuery::last("d1", "voltage", chrono::Duration::hours(1), now).with_limit(2000);
        assert_eq!(query.from, 1_700_000_000);
        assert_eq!(query.to, 1_700_003_600);
        assert_eq!(query.limit, Some(2000));
    }
}
