//! Device-facing DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Command;

/// Response to `POST /api/device/data` and `GET /api/device/commands`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAckResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Every command queued since the last contact, oldest first.
    pub pending_commands: Vec<Command>,
}

impl DeviceAckResponse {
    /// Wraps drained commands.
    #[must_use]
    pub fn ok(pending_commands: Vec<Command>) -> Self {
        Self {
            status: "ok".to_string(),
            pending_commands,
        }
    }
}
