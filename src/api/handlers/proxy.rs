//! Proxy-mode handlers: sensor data and LED control forwarded to the
//! device's own HTTP server.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::extract::{OperatorGate, json_body};
use crate::app_state::AppState;
use crate::domain::{LedPatch, Reading};
use crate::error::{ErrorResponse, RelayError};

/// `GET /sensor-data` — Fetch a fresh reading from the device.
///
/// # Errors
///
/// Returns [`RelayError::UpstreamUnavailable`] when the device fails or
/// times out.
#[utoipa::path(
    get,
    path = "/api/sensor-data",
    tag = "Proxy",
    summary = "Fetch reading from device",
    description = "Proxy mode only. Fetches the device's reading, records it, and returns it.",
    responses(
        (status = 200, description = "Reading fetched", body = Reading),
        (status = 502, description = "Device unavailable", body = ErrorResponse),
    )
)]
pub async fn sensor_data(State(state): State<AppState>) -> Result<impl IntoResponse, RelayError> {
    let reading = state.proxy()?.fetch_sensor_data().await?;
    Ok(Json(reading))
}

/// `POST /led` — Forward an LED update to the device.
///
/// # Errors
///
/// Returns [`RelayError::UpstreamUnavailable`] when the device fails.
#[utoipa::path(
    post,
    path = "/api/led",
    tag = "Proxy",
    summary = "Forward LED update",
    description = "Proxy mode only. Forwards the body to the device, mirrors it locally on success, and returns the device's response.",
    request_body = LedPatch,
    responses(
        (status = 200, description = "Device response", body = serde_json::Value),
        (status = 401, description = "Operator session required", body = ErrorResponse),
        (status = 502, description = "Device unavailable", body = ErrorResponse),
    )
)]
pub async fn set_led(
    State(state): State<AppState>,
    OperatorGate(_operator): OperatorGate,
    payload: Result<Json<LedPatch>, JsonRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let patch = json_body(payload)?;
    let body = state.proxy()?.set_led(&patch).await?;
    Ok(Json(body))
}

/// `GET /led-status` — LED state as reported by the device.
///
/// # Errors
///
/// Returns [`RelayError::UpstreamUnavailable`] when the device fails.
#[utoipa::path(
    get,
    path = "/api/led-status",
    tag = "Proxy",
    summary = "LED state from device",
    responses(
        (status = 200, description = "Device LED state", body = serde_json::Value),
        (status = 502, description = "Device unavailable", body = ErrorResponse),
    )
)]
pub async fn led_status(State(state): State<AppState>) -> Result<impl IntoResponse, RelayError> {
    let body = state.proxy()?.led_status().await?;
    Ok(Json(body))
}

/// Proxy-mode routes replacing the push-mode sensor and LED routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sensor-data", get(sensor_data))
        .route("/led", post(set_led))
        .route("/led-status", get(led_status))
}
