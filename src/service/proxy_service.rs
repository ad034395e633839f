//! Proxy variant: forwards to the device's own embedded HTTP server.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::RelayService;
use super::relay_service::now_ms;
use crate::domain::{LedPatch, Reading, ReadingPayload};
use crate::error::RelayError;

/// Thin HTTP client for the device's `/sensor-data`, `/led`, and
/// `/led-status` endpoints.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Arc<String>,
}

impl DeviceClient {
    /// Creates a client whose every request times out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Internal(format!("device http client: {e}")))?;
        Ok(Self {
            http,
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
        })
    }

    /// `GET /sensor-data` on the device.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UpstreamUnavailable`] on transport failure,
    /// timeout, non-2xx status, or an undecodable body.
    pub async fn sensor_data(&self) -> Result<ReadingPayload, RelayError> {
        let response = self
            .http
            .get(format!("{}/sensor-data", self.base_url))
            .send()
            .await
            .map_err(upstream)?;
        decode(response).await
    }

    /// `POST /led` on the device, returning its response body verbatim.
    ///
    /// # Errors
    ///
    /// See [`DeviceClient::sensor_data`].
    pub async fn set_led(&self, patch: &LedPatch) -> Result<serde_json::Value, RelayError> {
        let response = self
            .http
            .post(format!("{}/led", self.base_url))
            .json(patch)
            .send()
            .await
            .map_err(upstream)?;
        decode(response).await
    }

    /// `GET /led-status` on the device, returning its response body verbatim.
    ///
    /// # Errors
    ///
    /// See [`DeviceClient::sensor_data`].
    pub async fn led_status(&self) -> Result<serde_json::Value, RelayError> {
        let response = self
            .http
            .get(format!("{}/led-status", self.base_url))
            .send()
            .await
            .map_err(upstream)?;
        decode(response).await
    }
}

fn upstream(err: reqwest::Error) -> RelayError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    RelayError::UpstreamUnavailable(message)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RelayError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(RelayError::UpstreamUnavailable(format!(
            "device returned status {status}: {detail}"
        )));
    }
    response.json::<T>().await.map_err(upstream)
}

/// Proxy-mode orchestration: device calls plus local bookkeeping.
///
/// Successful polls are recorded through [`RelayService`] so history,
/// liveness, and push updates work the same as in push mode.
#[derive(Debug, Clone)]
pub struct ProxyService {
    client: DeviceClient,
    relay: Arc<RelayService>,
}

impl ProxyService {
    /// Creates a proxy service over `client`, recording into `relay`.
    #[must_use]
    pub fn new(client: DeviceClient, relay: Arc<RelayService>) -> Self {
        Self { client, relay }
    }

    /// Fetches the current reading from the device and records it.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UpstreamUnavailable`] if the device call fails
    /// or its reply omits a measurement.
    pub async fn fetch_sensor_data(&self) -> Result<Reading, RelayError> {
        let payload = self.client.sensor_data().await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to fetch sensor data from device");
        })?;
        let now = now_ms();
        let reading = payload.into_reading(now).map_err(|err| {
            tracing::warn!(error = %err, "device returned an incomplete reading");
            RelayError::UpstreamUnavailable(format!("device sent an incomplete reading: {err}"))
        })?;
        tracing::info!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            "polled device reading"
        );
        self.relay.record_reading(reading.clone(), now).await;
        Ok(reading)
    }

    /// Forwards an LED update to the device; on success mirrors it locally.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UpstreamUnavailable`] if the device call fails.
    pub async fn set_led(&self, patch: &LedPatch) -> Result<serde_json::Value, RelayError> {
        let body = self.client.set_led(patch).await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to set led on device");
        })?;
        let _ = self.relay.mirror_led(patch).await;
        Ok(body)
    }

    /// Reads the LED state straight from the device.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UpstreamUnavailable`] if the device call fails.
    pub async fn led_status(&self) -> Result<serde_json::Value, RelayError> {
        self.client.led_status().await.inspect_err(|err| {
            tracing::warn!(error = %err, "failed to get led status from device");
        })
    }
}
