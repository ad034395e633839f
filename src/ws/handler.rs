//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::{Connection, run_connection};
use crate::app_state::AppState;

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct WsParams {
    /// Operator session token; only consulted when `AUTH_MODE=full`.
    #[serde(default)]
    pub token: Option<String>,
}

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// In `full` auth mode a socket without a valid `?token=` is read-only:
/// it receives every event but its `set-led` frames are refused.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
) -> impl IntoResponse {
    let can_control = if state.config.auth_mode.guards_operator() {
        params
            .token
            .as_deref()
            .is_some_and(|token| state.auth_service.authenticate(token).is_ok())
    } else {
        true
    };

    // Subscribe before the upgrade so nothing published in between is lost.
    let connection = Connection {
        event_rx: state.event_bus.subscribe(),
        relay_service: Arc::clone(&state.relay_service),
        proxy_service: state.proxy_service.clone(),
        can_control,
    };

    ws.on_upgrade(move |socket| run_connection(socket, connection))
}
