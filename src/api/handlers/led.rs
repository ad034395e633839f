//! LED control handlers (push mode): queue a command, read the mirror.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::LedResponse;
use crate::api::extract::{OperatorGate, json_body};
use crate::app_state::AppState;
use crate::domain::{LedPatch, LedState};
use crate::error::{ErrorResponse, RelayError};

/// `POST /led` — Merge a partial LED update and queue it for the device.
///
/// # Errors
///
/// Returns [`RelayError::Validation`] on a malformed body, or
/// [`RelayError::Unauthorized`] without a session in `full` auth mode.
#[utoipa::path(
    post,
    path = "/api/led",
    tag = "LED",
    summary = "Set LED state",
    description = "Merges the given fields into the current LED state, queues the merged state for the device's next contact, and broadcasts `led-update`. Requires a bearer token when AUTH_MODE=full.",
    request_body = LedPatch,
    responses(
        (status = 200, description = "LED command queued", body = LedResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Operator session required", body = ErrorResponse),
    )
)]
pub async fn set_led(
    State(state): State<AppState>,
    OperatorGate(operator): OperatorGate,
    payload: Result<Json<LedPatch>, JsonRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let patch = json_body(payload)?;
    if let Some(claims) = &operator {
        tracing::debug!(operator = %claims.sub, "led update requested");
    }
    let led_state = state.relay_service.set_led(&patch).await;
    Ok(Json(LedResponse {
        status: "ok".to_string(),
        message: "LED command queued for device".to_string(),
        led_state,
    }))
}

/// `GET /led-status` — Current LED state.
#[utoipa::path(
    get,
    path = "/api/led-status",
    tag = "LED",
    summary = "LED state",
    responses(
        (status = 200, description = "Current LED state", body = LedState),
    )
)]
pub async fn led_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.relay_service.led_status().await)
}

/// Push-mode LED routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/led", post(set_led))
        .route("/led-status", get(led_status))
}
