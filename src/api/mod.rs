//! REST API layer: route handlers, DTOs, extractors, and router composition.
//!
//! Resource endpoints are mounted under `/api`; `/health` sits at the root.
//! Which resource routes exist depends on the relay and auth modes.

pub mod docs;
pub mod dto;
pub mod extract;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::ws::handler::ws_handler;

/// Builds the REST router for the configured modes.
pub fn build_router(config: &RelayConfig) -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes(config))
        .merge(handlers::system::routes())
}

/// Builds the complete application: REST, WebSocket, docs, and the
/// tracing and CORS layers, bound to `state`.
pub fn build_app(state: AppState) -> Router {
    let router = build_router(&state.config).route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs")
            .url("/api-doc/openapi.json", docs::openapi_for(state.config.relay_mode)),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
