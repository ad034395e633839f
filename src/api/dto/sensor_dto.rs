//! Sensor reading and history DTOs.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{LivenessStatus, Reading};
use crate::error::RelayError;

/// Response body for `GET /api/sensor-data`: the latest reading with the
/// device's liveness merged in.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestReadingResponse {
    /// Latest reading fields.
    #[serde(flatten)]
    pub reading: Reading,
    /// Time of the last device contact, epoch milliseconds.
    pub last_contact: i64,
    /// Whether the device is presumed connected.
    pub connected: bool,
}

impl LatestReadingResponse {
    /// Combines a reading with the current liveness.
    #[must_use]
    pub fn new(reading: Reading, liveness: LivenessStatus) -> Self {
        Self {
            reading,
            last_contact: liveness.last_contact,
            connected: liveness.connected,
        }
    }
}

/// Query parameters for `GET /api/history`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Only return readings from the last `hours` hours (fractions allowed).
    #[serde(default)]
    pub hours: Option<f64>,
}

impl HistoryParams {
    /// Converts `hours` into a window.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] for negative or non-finite hours.
    pub fn window(&self) -> Result<Option<Duration>, RelayError> {
        let Some(hours) = self.hours else {
            return Ok(None);
        };
        Duration::try_from_secs_f64(hours * 3600.0)
            .map(Some)
            .map_err(|_| RelayError::Validation(format!("invalid hours: {hours}")))
    }
}

/// Response body for `GET /api/simulate`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SimulateResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
    /// The generated reading.
    pub data: Reading,
}
