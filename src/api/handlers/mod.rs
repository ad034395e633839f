//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod device;
pub mod led;
pub mod proxy;
pub mod sensor;
pub mod system;

use axum::Router;

use crate::app_state::AppState;
use crate::config::{RelayConfig, RelayMode};

/// Composes the resource routes mounted under `/api` for the configured
/// relay and auth modes.
pub fn routes(config: &RelayConfig) -> Router<AppState> {
    let router = Router::new()
        .merge(sensor::routes())
        .merge(system::api_routes());

    let router = match config.relay_mode {
        RelayMode::Push => router
            .merge(device::routes())
            .merge(sensor::push_routes())
            .merge(led::routes()),
        RelayMode::Proxy => router.merge(proxy::routes()),
    };

    if config.auth_mode.guards_operator() {
        router.merge(auth::routes())
    } else {
        router
    }
}
