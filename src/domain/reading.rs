//! Sensor readings as pushed by the device or produced by the simulator.

use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::LedState;
use crate::error::RelayError;

/// Status string stamped on readings generated by the relay itself.
pub const SIMULATED_STATUS: &str = "simulated";

/// One timestamped temperature/humidity sample.
///
/// Immutable once stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Sample time, epoch milliseconds.
    pub timestamp: i64,
    /// Sensor status reported by the device (`"ok"`, `"error"`, `"simulated"`).
    pub status: String,
    /// LED state the device reported alongside the sample, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led: Option<LedState>,
}

impl Reading {
    /// Builds a simulated reading: 20–30 °C and 40–60 % humidity.
    #[must_use]
    pub fn simulated(now_ms: i64) -> Self {
        let mut rng = rand::rng();
        Self {
            temperature: round_tenth(rng.random_range(20.0..30.0)),
            humidity: round_tenth(rng.random_range(40.0..60.0)),
            timestamp: now_ms,
            status: SIMULATED_STATUS.to_string(),
            led: None,
        }
    }

    /// The fixed reading seeded at boot.
    #[must_use]
    pub fn boot_seed(now_ms: i64) -> Self {
        Self {
            temperature: 22.5,
            humidity: 45.0,
            timestamp: now_ms,
            status: SIMULATED_STATUS.to_string(),
            led: None,
        }
    }
}

/// Reading as received on the wire; every field is optional.
///
/// Missing `timestamp` and `status` are defaulted; missing measurements
/// are rejected by [`ReadingPayload::into_reading`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReadingPayload {
    /// Temperature in degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Sample time, epoch milliseconds. Defaults to the receive time.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Sensor status. Defaults to `"ok"`.
    #[serde(default)]
    pub status: Option<String>,
    /// LED state reported by the device.
    #[serde(default)]
    pub led: Option<LedState>,
}

impl ReadingPayload {
    /// Completes the payload into a [`Reading`], stamping `now_ms` when the
    /// timestamp is absent or zero.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] if temperature or humidity is
    /// missing or not finite.
    pub fn into_reading(self, now_ms: i64) -> Result<Reading, RelayError> {
        let temperature = finite(self.temperature, "temperature")?;
        let humidity = finite(self.humidity, "humidity")?;
        let timestamp = match self.timestamp {
            Some(ts) if ts != 0 => ts,
            _ => now_ms,
        };
        Ok(Reading {
            temperature,
            humidity,
            timestamp,
            status: self.status.unwrap_or_else(|| "ok".to_string()),
            led: self.led,
        })
    }
}

fn finite(value: Option<f64>, field: &str) -> Result<f64, RelayError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(RelayError::Validation(format!("{field} must be a finite number"))),
        None => Err(RelayError::Validation(format!("missing field `{field}`"))),
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
