//! Shared harness: boots the full application on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use sensor_relay::api;
use sensor_relay::app_state::AppState;
use sensor_relay::config::RelayConfig;

/// Device key configured by [`test_config`].
pub const DEVICE_KEY: &str = "test-device-key";

/// A running relay.
#[derive(Debug)]
pub struct TestServer {
    /// `http://127.0.0.1:<port>`.
    pub base_url: String,
    /// `ws://127.0.0.1:<port>/ws`.
    pub ws_url: String,
    /// The state the server was built with.
    pub state: AppState,
}

/// Config with a known device key and no boot seed.
pub fn test_config() -> RelayConfig {
    RelayConfig {
        device_api_key: DEVICE_KEY.to_string(),
        session_secret: "integration-secret".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "s3cret".to_string(),
        seed_simulated_reading: false,
        ..RelayConfig::default()
    }
}

/// Builds the app from `config` and serves it on an ephemeral port.
pub async fn spawn_server(config: RelayConfig) -> TestServer {
    let Ok(state) = AppState::from_config(config).await else {
        panic!("app state must build");
    };
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    let app = api::build_app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        ws_url: format!("ws://{addr}/ws"),
        state,
    }
}
