//! Device registry endpoints

use serde::Deserialize;

use super::{Resource, path_with_segment};
use crate::{
    client::ApiClient,
    error::Result,
    http::RequestOptions,
    session::Session,
    types::{Device, DeviceDetail},
};

/// Devices API resource.
#[derive(Debug, Clone)]
pub struct Devices {
    session: Session,
}

// The server has answered both with a bare array and with an envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeviceList {
    Bare(Vec<Device>),
    Envelope {
        #[serde(default)]
        devices: Option<Vec<Device>>,
    },
}

impl From<DeviceList> for Vec<Device> {
    fn from(list: DeviceList) -> Self {
        match list {
            DeviceList::Bare(devices) => devices,
            DeviceList::Envelope { devices } => devices.unwrap_or_default(),
        }
    }
}

impl Devices {
    /// Create a new Devices resource.
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// List all registered devices.
    pub async fn list(&self) -> Result<Vec<Device>> {
        let list: DeviceList = self
            .session
            .authorized("/api/v1/devices", &RequestOptions::get())
            .await?;
        Ok(list.into())
    }

    /// Registry entry, last state and last telemetry of one device.
    pub async fn get(&self, device_id: &str) -> Result<DeviceDetail> {
        let path = path_with_segment("/api/v1/devices", device_id, "")?;
        self.session.authorized(&path, &RequestOptions::get()).await
    }
}

impl Resource for Devices {
    fn client(&self) -> &ApiClient {
        self.session.client()
    }
}
