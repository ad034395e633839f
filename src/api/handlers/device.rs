//! Device-facing handlers: reading ingest and command polling.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::DeviceAckResponse;
use crate::api::extract::{DeviceKey, json_body};
use crate::app_state::AppState;
use crate::domain::ReadingPayload;
use crate::error::{ErrorResponse, RelayError};

/// `POST /device/data` — Device pushes a reading.
///
/// # Errors
///
/// Returns [`RelayError::Unauthorized`] on a bad device key and
/// [`RelayError::Validation`] on a body that is not JSON.
#[utoipa::path(
    post,
    path = "/api/device/data",
    tag = "Device",
    summary = "Push a sensor reading",
    description = "Records the reading, refreshes device liveness, broadcasts `sensor-update`, and returns every queued command. Missing `timestamp` defaults to now and missing `status` to \"ok\". A push missing `temperature` or `humidity` still counts as contact and drains the queue, but is not stored.",
    request_body = ReadingPayload,
    params(
        ("x-api-key" = Option<String>, Header, description = "Device shared secret"),
    ),
    responses(
        (status = 200, description = "Reading accepted; pending commands drained", body = DeviceAckResponse),
        (status = 400, description = "Body is not JSON", body = ErrorResponse),
        (status = 401, description = "Bad device key", body = ErrorResponse),
    )
)]
pub async fn push_reading(
    State(state): State<AppState>,
    DeviceKey(key): DeviceKey,
    payload: Result<Json<ReadingPayload>, JsonRejection>,
) -> Result<impl IntoResponse, RelayError> {
    // Credential before body.
    state.relay_service.check_device(key.as_deref())?;
    let payload = json_body(payload)?;
    let pending = state
        .relay_service
        .submit_reading(key.as_deref(), payload)
        .await?;
    Ok(Json(DeviceAckResponse::ok(pending)))
}

/// `GET /device/commands` — Device polls for queued commands.
///
/// # Errors
///
/// Returns [`RelayError::Unauthorized`] on a bad device key.
#[utoipa::path(
    get,
    path = "/api/device/commands",
    tag = "Device",
    summary = "Poll pending commands",
    description = "Refreshes device liveness and drains the command queue.",
    params(
        ("x-api-key" = Option<String>, Header, description = "Device shared secret"),
    ),
    responses(
        (status = 200, description = "Pending commands drained", body = DeviceAckResponse),
        (status = 401, description = "Bad device key", body = ErrorResponse),
    )
)]
pub async fn poll_commands(
    State(state): State<AppState>,
    DeviceKey(key): DeviceKey,
) -> Result<impl IntoResponse, RelayError> {
    let pending = state.relay_service.poll_commands(key.as_deref()).await?;
    Ok(Json(DeviceAckResponse::ok(pending)))
}

/// Device routes, mounted only in push mode.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/device/data", post(push_reading))
        .route("/device/commands", get(poll_commands))
}
