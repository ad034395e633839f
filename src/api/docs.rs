//! OpenAPI documents, one per relay mode.

use utoipa::OpenApi;

use crate::api::dto;
use crate::api::handlers::{auth, device, led, proxy, sensor, system};
use crate::auth::{Role, UserSummary};
use crate::config::RelayMode;
use crate::domain::{Command, LedPatch, LedState, LivenessStatus, Reading, ReadingPayload};
use crate::error::{ErrorBody, ErrorResponse};

/// Push-mode API: device ingest, local LED queue, operator sessions.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "sensor-relay", description = "Relay between a sensor/LED device and web clients."),
    paths(
        device::push_reading,
        device::poll_commands,
        sensor::latest_reading,
        sensor::history,
        sensor::simulate,
        led::set_led,
        led::led_status,
        auth::login,
        auth::list_users,
        system::health_handler,
        system::status_handler,
        system::test_handler,
    ),
    components(schemas(
        Reading,
        ReadingPayload,
        LedState,
        LedPatch,
        Command,
        LivenessStatus,
        Role,
        UserSummary,
        ErrorResponse,
        ErrorBody,
        dto::DeviceAckResponse,
        dto::LatestReadingResponse,
        dto::SimulateResponse,
        dto::LedResponse,
        dto::LoginRequest,
        dto::LoginResponse,
        dto::StatusResponse,
        dto::HealthResponse,
        dto::TestResponse,
    ))
)]
pub struct ApiDoc;

/// Proxy-mode API: sensor and LED calls forwarded to the device.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "sensor-relay (proxy)", description = "Relay forwarding to the device's own HTTP server."),
    paths(
        proxy::sensor_data,
        proxy::set_led,
        proxy::led_status,
        sensor::history,
        sensor::simulate,
        auth::login,
        auth::list_users,
        system::health_handler,
        system::status_handler,
        system::test_handler,
    ),
    components(schemas(
        Reading,
        LedState,
        LedPatch,
        Role,
        UserSummary,
        ErrorResponse,
        ErrorBody,
        dto::SimulateResponse,
        dto::LoginRequest,
        dto::LoginResponse,
        dto::StatusResponse,
        dto::HealthResponse,
        dto::TestResponse,
    ))
)]
pub struct ProxyApiDoc;

/// The document matching `mode`.
#[must_use]
pub fn openapi_for(mode: RelayMode) -> utoipa::openapi::OpenApi {
    match mode {
        RelayMode::Push => ApiDoc::openapi(),
        RelayMode::Proxy => ProxyApiDoc::openapi(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_document_lists_device_routes() {
        let doc = openapi_for(RelayMode::Push);
        assert!(doc.paths.paths.contains_key("/api/device/data"));
        assert!(doc.paths.paths.contains_key("/api/history"));
    }

    #[test]
    fn proxy_document_omits_device_routes() {
        let doc = openapi_for(RelayMode::Proxy);
        assert!(!doc.paths.paths.contains_key("/api/device/data"));
        assert!(doc.paths.paths.contains_key("/api/led-status"));
    }
}
