//! System endpoints: health check, relay status, API self-test.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{HealthResponse, StatusResponse, TestResponse};
use crate::app_state::AppState;

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /api/status` — Device liveness, client count, uptime, queue depth.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "System",
    summary = "Relay status",
    responses(
        (status = 200, description = "Relay status", body = StatusResponse),
    )
)]
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse::from(state.relay_service.status().await))
}

/// `GET /api/test` — Confirms the API is reachable.
#[utoipa::path(
    get,
    path = "/api/test",
    tag = "System",
    summary = "API self-test",
    responses(
        (status = 200, description = "API is working", body = TestResponse),
    )
)]
pub async fn test_handler() -> impl IntoResponse {
    let now = Utc::now();
    Json(TestResponse {
        message: "API is working".to_string(),
        timestamp: now.timestamp_millis(),
        server_time: now.to_rfc3339(),
    })
}

/// System routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status_handler))
        .route("/test", get(test_handler))
}

/// System routes mounted at the root level (not under `/api`).
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
