//! System endpoint DTOs: status, health, self-test.

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::RelayStatus;

/// Response body for `GET /api/status`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Whether the device is presumed connected.
    pub connected: bool,
    /// Time of the last device contact, epoch milliseconds.
    pub last_contact: i64,
    /// Connected push-channel clients.
    pub subscriber_count: usize,
    /// Process uptime in seconds.
    pub uptime: f64,
    /// Commands waiting for the device.
    pub queue_depth: usize,
}

impl From<RelayStatus> for StatusResponse {
    fn from(status: RelayStatus) -> Self {
        Self {
            connected: status.liveness.connected,
            last_contact: status.liveness.last_contact,
            subscriber_count: status.subscriber_count,
            uptime: status.uptime_secs,
            queue_depth: status.queue_depth,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// RFC 3339 server time.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Response body for `GET /api/test`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    /// Fixed greeting.
    pub message: String,
    /// Server time, epoch milliseconds.
    pub timestamp: i64,
    /// Server time, RFC 3339.
    pub server_time: String,
}
