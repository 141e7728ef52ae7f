//! Command dispatch endpoint

use super::{Resource, path_with_segment};
use crate::{
    client::ApiClient,
    error::{Error, Result},
    http::RequestOptions,
    session::Session,
    types::{CommandAck, CommandRequest, SendCommandResponse},
};

/// Commands API resource.
#[derive(Debug, Clone)]
pub struct Commands {
    session: Session,
}

impl Commands {
    /// Create a new Commands resource.
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// Send a command to a device and wait for its acknowledgement.
    ///
    /// The server holds the request open until the device answers or the
    /// command's timeout passes; a timed-out command comes back as a 504
    /// [`ApiError`](crate::ApiError).
    pub async fn send(&self, device_id: &str, command: &CommandRequest) -> Result<CommandAck> {
        let path = path_with_segment("/api/v1/dev", device_id, "/cmd")?;
        let options = RequestOptions::post().json(command)?;
        let response: SendCommandResponse = self.session.authorized(&path, &options).await?;
        Ok(response.ack)
    }
}

/// The acknowledgement carried by a failed dispatch.
///
/// A command that times out or fails on the server still comes back with an
/// `ack` body (504 or 500); its JSON ends up as the error message.
pub fn ack_from_error(err: &Error) -> Option<CommandAck> {
    let api = err.as_api_error()?;
    serde_json::from_str::<SendCommandResponse>(&api.message)
        .ok()
        .map(|response| response.ack)
}

impl Resource for Commands {
    fn client(&self) -> &ApiClient {
        self.session.client()
    }
}
