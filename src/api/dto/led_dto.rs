//! LED control DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::LedState;

/// Response body for `POST /api/led` in push mode.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
    /// Merged LED state that was queued.
    pub led_state: LedState,
}
