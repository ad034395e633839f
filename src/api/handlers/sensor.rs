//! Sensor read handlers: latest reading, history window, simulator.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{HistoryParams, LatestReadingResponse, SimulateResponse};
use crate::api::extract::query_params;
use crate::app_state::AppState;
use crate::domain::Reading;
use crate::error::{ErrorResponse, RelayError};
use crate::service::now_ms;

/// `GET /sensor-data` — Latest reading with device liveness.
///
/// # Errors
///
/// Returns [`RelayError::NoReading`] before the first reading.
#[utoipa::path(
    get,
    path = "/api/sensor-data",
    tag = "Sensor",
    summary = "Latest reading",
    description = "Returns the most recent reading merged with `lastContact` and `connected`.",
    responses(
        (status = 200, description = "Latest reading", body = LatestReadingResponse),
        (status = 404, description = "No reading recorded yet", body = ErrorResponse),
    )
)]
pub async fn latest_reading(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, RelayError> {
    let (reading, liveness) = state.relay_service.latest().await?;
    Ok(Json(LatestReadingResponse::new(reading, liveness)))
}

/// `GET /history` — Buffered readings, optionally limited to recent hours.
///
/// # Errors
///
/// Returns [`RelayError::Validation`] for an unparsable or negative `hours`.
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "Sensor",
    summary = "Reading history",
    description = "Returns buffered readings oldest first. With `hours`, only readings newer than now minus that many hours.",
    params(HistoryParams),
    responses(
        (status = 200, description = "Readings, oldest first", body = Vec<Reading>),
        (status = 400, description = "Invalid `hours`", body = ErrorResponse),
    )
)]
pub async fn history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let window = query_params(params)?.window()?;
    Ok(Json(state.relay_service.history(window).await))
}

/// `GET /simulate` — Records a random reading as if the device sent it.
#[utoipa::path(
    get,
    path = "/api/simulate",
    tag = "Sensor",
    summary = "Simulate a reading",
    description = "Generates a reading (20-30 °C, 40-60 %) and records it like a device push, without draining the command queue.",
    responses(
        (status = 200, description = "Simulated reading recorded", body = SimulateResponse),
    )
)]
pub async fn simulate(State(state): State<AppState>) -> impl IntoResponse {
    let now = now_ms();
    let reading = Reading::simulated(now);
    state.relay_service.record_reading(reading.clone(), now).await;
    tracing::info!(
        temperature = reading.temperature,
        humidity = reading.humidity,
        "simulated reading recorded"
    );
    Json(SimulateResponse {
        status: "ok".to_string(),
        message: "simulated data generated".to_string(),
        data: reading,
    })
}

/// History and simulator routes, mounted in every relay mode.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(history))
        .route("/simulate", get(simulate))
}

/// Push-mode latest reading route.
pub fn push_routes() -> Router<AppState> {
    Router::new().route("/sensor-data", get(latest_reading))
}
