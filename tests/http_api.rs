//! End-to-end REST tests against a live server.

#![allow(clippy::panic)]

mod common;

use reqwest::StatusCode;
use sensor_relay::config::{AuthMode, RelayConfig, RelayMode};
use serde_json::{Value, json};

use common::{DEVICE_KEY, spawn_server, test_config};

async fn body(response: reqwest::Response) -> Value {
    let Ok(value) = response.json::<Value>().await else {
        panic!("response body must be JSON");
    };
    value
}

#[tokio::test]
async fn health_and_self_test() {
    let server = spawn_server(test_config()).await;
    let client = reqwest::Client::new();

    let Ok(response) = client.get(format!("{}/health", server.base_url)).send().await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await["status"], "healthy");

    let Ok(response) = client.get(format!("{}/api/test", server.base_url)).send().await else {
        panic!("request failed");
    };
    let json = body(response).await;
    assert_eq!(json["message"], "API is working");
    assert!(json["serverTime"].is_string());
}

#[tokio::test]
async fn sensor_data_is_404_before_first_reading() {
    let server = spawn_server(test_config()).await;
    let Ok(response) = reqwest::get(format!("{}/api/sensor-data", server.base_url)).await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(response).await["error"]["code"], 3001);
}

#[tokio::test]
async fn boot_seed_is_served_when_enabled() {
    let config = RelayConfig {
        seed_simulated_reading: true,
        ..test_config()
    };
    let server = spawn_server(config).await;
    let Ok(response) = reqwest::get(format!("{}/api/sensor-data", server.base_url)).await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let json = body(response).await;
    assert_eq!(json["status"], "simulated");
    assert_eq!(json["connected"], false);
}

#[tokio::test]
async fn device_push_requires_key_and_leaves_state_untouched() {
    let server = spawn_server(test_config()).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/device/data", server.base_url);

    let Ok(response) = client
        .post(&url)
        .json(&json!({"temperature": 21.0, "humidity": 50.0}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let Ok(response) = client
        .post(&url)
        .header("x-api-key", "wrong")
        .json(&json!({"temperature": 21.0, "humidity": 50.0}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(response).await["error"]["code"], 2001);

    let status = server.state.relay_service.status().await;
    assert_eq!(status.history_len, 0);
    assert!(!status.liveness.connected);
}

#[tokio::test]
async fn led_command_is_delivered_once_on_next_push() {
    let server = spawn_server(test_config()).await;
    let client = reqwest::Client::new();

    let Ok(response) = client
        .post(format!("{}/api/led", server.base_url))
        .json(&json!({"r": 255}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let json = body(response).await;
    assert_eq!(json["ledState"]["r"], 255);
    assert_eq!(json["ledState"]["g"], 150);
    assert_eq!(json["ledState"]["effect"], "solid");

    let push = || {
        client
            .post(format!("{}/api/device/data", server.base_url))
            .header("x-api-key", DEVICE_KEY)
            .json(&json!({"temperature": 23.5, "humidity": 48.0}))
            .send()
    };

    let Ok(response) = push().await else {
        panic!("request failed");
    };
    let json = body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["pendingCommands"][0]["type"], "led");
    assert_eq!(json["pendingCommands"][0]["data"]["r"], 255);

    let Ok(response) = push().await else {
        panic!("request failed");
    };
    assert_eq!(body(response).await["pendingCommands"], json!([]));

    let Ok(response) = reqwest::get(format!("{}/api/sensor-data", server.base_url)).await else {
        panic!("request failed");
    };
    let json = body(response).await;
    assert_eq!(json["temperature"], 23.5);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["connected"], true);
}

#[tokio::test]
async fn device_poll_drains_queue() {
    let server = spawn_server(test_config()).await;
    let client = reqwest::Client::new();
    let _ = server
        .state
        .relay_service
        .set_led(&sensor_relay::domain::LedPatch {
            effect: Some("blink".to_string()),
            ..Default::default()
        })
        .await;

    let Ok(response) = client
        .get(format!("{}/api/device/commands", server.base_url))
        .header("x-api-key", DEVICE_KEY)
        .send()
        .await
    else {
        panic!("request failed");
    };
    let json = body(response).await;
    assert_eq!(json["pendingCommands"][0]["data"]["effect"], "blink");
    assert_eq!(server.state.relay_service.status().await.queue_depth, 0);
}

#[tokio::test]
async fn incomplete_push_still_delivers_commands() {
    let server = spawn_server(test_config()).await;
    let client = reqwest::Client::new();
    let _ = server
        .state
        .relay_service
        .set_led(&sensor_relay::domain::LedPatch {
            r: Some(7),
            ..Default::default()
        })
        .await;

    let Ok(response) = client
        .post(format!("{}/api/device/data", server.base_url))
        .header("x-api-key", DEVICE_KEY)
        .json(&json!({"status": "error"}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await["pendingCommands"][0]["data"]["r"], 7);

    let status = server.state.relay_service.status().await;
    assert!(status.liveness.connected);
    assert_eq!(status.history_len, 0);
}

#[tokio::test]
async fn non_json_push_is_bad_request() {
    let server = spawn_server(test_config()).await;
    let Ok(response) = reqwest::Client::new()
        .post(format!("{}/api/device/data", server.base_url))
        .header("x-api-key", DEVICE_KEY)
        .header("content-type", "application/json")
        .body("{\"temperature\":")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(response).await["error"]["code"], 1001);
}

#[tokio::test]
async fn simulate_feeds_history() {
    let server = spawn_server(test_config()).await;
    for _ in 0..3 {
        let Ok(response) = reqwest::get(format!("{}/api/simulate", server.base_url)).await else {
            panic!("request failed");
        };
        assert_eq!(body(response).await["data"]["status"], "simulated");
    }

    let Ok(response) = reqwest::get(format!("{}/api/history", server.base_url)).await else {
        panic!("request failed");
    };
    let Some(all) = body(response).await.as_array().map(Vec::len) else {
        panic!("history must be an array");
    };
    assert_eq!(all, 3);

    let Ok(response) = reqwest::get(format!("{}/api/history?hours=1", server.base_url)).await
    else {
        panic!("request failed");
    };
    assert_eq!(body(response).await.as_array().map(Vec::len), Some(3));

    let Ok(response) = reqwest::get(format!("{}/api/history?hours=abc", server.base_url)).await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let Ok(response) = reqwest::get(format!("{}/api/status", server.base_url)).await else {
        panic!("request failed");
    };
    let json = body(response).await;
    assert_eq!(json["connected"], true);
    assert_eq!(json["queueDepth"], 0);
    assert_eq!(json["subscriberCount"], 0);
}

#[tokio::test]
async fn full_mode_gates_led_and_admin_listing() {
    let config = RelayConfig {
        auth_mode: AuthMode::Full,
        ..test_config()
    };
    let server = spawn_server(config).await;
    let client = reqwest::Client::new();

    let Ok(response) = client
        .post(format!("{}/api/led", server.base_url))
        .json(&json!({"b": 10}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let Ok(response) = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({"username": "admin", "password": "nope"}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let Ok(response) = client
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({"username": "admin", "password": "s3cret"}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    let json = body(response).await;
    assert_eq!(json["role"], "admin");
    let Some(token) = json["token"].as_str().map(str::to_owned) else {
        panic!("token expected");
    };

    let Ok(response) = client
        .post(format!("{}/api/led", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"b": 10}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);

    let Ok(response) = client
        .get(format!("{}/api/admin/users", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
    else {
        panic!("request failed");
    };
    let json = body(response).await;
    assert_eq!(json, json!([{"username": "admin", "role": "admin"}]));
}

#[tokio::test]
async fn login_is_not_mounted_outside_full_mode() {
    let server = spawn_server(test_config()).await;
    let Ok(response) = reqwest::Client::new()
        .post(format!("{}/api/login", server.base_url))
        .json(&json!({"username": "admin", "password": "s3cret"}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn proxy_mode_reports_unreachable_device_as_bad_gateway() {
    let config = RelayConfig {
        relay_mode: RelayMode::Proxy,
        device_base_url: "http://127.0.0.1:9".to_string(),
        device_timeout: std::time::Duration::from_millis(500),
        ..test_config()
    };
    let server = spawn_server(config).await;

    let Ok(response) = reqwest::get(format!("{}/api/led-status", server.base_url)).await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body(response).await["error"]["code"], 5002);

    let Ok(response) = reqwest::Client::new()
        .get(format!("{}/api/device/commands", server.base_url))
        .header("x-api-key", DEVICE_KEY)
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
