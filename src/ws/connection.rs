//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! sends the current snapshot, forwards relay events, and applies
//! `set-led` commands.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{ClientMessage, ServerMessage};
use crate::domain::RelayEvent;
use crate::error::RelayError;
use crate::service::{ProxyService, RelayService};

/// Everything one connection needs, captured at upgrade time.
#[derive(Debug)]
pub struct Connection {
    /// Event bus subscription.
    pub event_rx: broadcast::Receiver<RelayEvent>,
    /// Relay service for snapshots and push-mode LED updates.
    pub relay_service: Arc<RelayService>,
    /// Device proxy; LED updates go through it in proxy mode.
    pub proxy_service: Option<Arc<ProxyService>>,
    /// Whether `set-led` frames from this client are honoured.
    pub can_control: bool,
}

type WsSink = SplitSink<WebSocket, Message>;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the client and sends the snapshot, if a reading exists.
/// - Reads commands from the client and dispatches them.
/// - Forwards events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, connection: Connection) {
    let Connection {
        mut event_rx,
        relay_service,
        proxy_service,
        can_control,
    } = connection;
    let (mut ws_tx, mut ws_rx) = socket.split();

    let id = relay_service.register_subscriber().await;
    tracing::debug!(subscriber = %id, can_control, "ws client connected");

    let mut open = true;
    for event in relay_service.snapshot_events().await {
        if send_json(&mut ws_tx, &event).await.is_err() {
            open = false;
            break;
        }
    }

    while open {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let outcome = handle_text(
                            text.as_str(),
                            &relay_service,
                            proxy_service.as_deref(),
                            can_control,
                        )
                        .await;
                        if let Err(err) = outcome
                            && send_json(&mut ws_tx, &ServerMessage::from(&err)).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(relay_event) => {
                        if send_json(&mut ws_tx, &relay_event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(subscriber = %id, lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    relay_service.unregister_subscriber(id).await;
    tracing::debug!(subscriber = %id, "ws connection closed");
}

async fn send_json<T: serde::Serialize>(ws_tx: &mut WsSink, frame: &T) -> Result<(), ()> {
    let json = serde_json::to_string(frame).map_err(|_| ())?;
    ws_tx.send(Message::text(json)).await.map_err(|_| ())
}

/// Applies one client text frame.
///
/// The resulting `led-update` reaches every client, this one included,
/// through the event bus.
async fn handle_text(
    text: &str,
    relay_service: &RelayService,
    proxy_service: Option<&ProxyService>,
    can_control: bool,
) -> Result<(), RelayError> {
    let ClientMessage::SetLed(patch) = ClientMessage::parse(text)?;
    if !can_control {
        return Err(RelayError::Unauthorized(
            "operator session required to control the LED".to_string(),
        ));
    }
    match proxy_service {
        Some(proxy) => proxy.set_led(&patch).await.map(|_| ()),
        None => {
            let _ = relay_service.set_led(&patch).await;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::auth::DeviceGuard;
    use crate::domain::EventBus;

    fn make_relay() -> RelayService {
        RelayService::new(
            EventBus::new(16),
            DeviceGuard::open(),
            10,
            Duration::from_secs(120),
            0,
        )
    }

    #[tokio::test]
    async fn set_led_frame_queues_command() {
        let relay = make_relay();
        let outcome = handle_text(r#"{"event":"set-led","data":{"b":200}}"#, &relay, None, true).await;
        assert!(outcome.is_ok());
        assert_eq!(relay.led_status().await.b, 200);
        assert_eq!(relay.status().await.queue_depth, 1);
    }

    #[tokio::test]
    async fn read_only_client_cannot_set_led() {
        let relay = make_relay();
        let outcome = handle_text(r#"{"event":"set-led","data":{"b":200}}"#, &relay, None, false).await;
        assert!(matches!(outcome, Err(RelayError::Unauthorized(_))));
        assert_eq!(relay.status().await.queue_depth, 0);
    }

    #[tokio::test]
    async fn malformed_frame_is_validation_error() {
        let relay = make_relay();
        let outcome = handle_text("{", &relay, None, true).await;
        assert!(matches!(outcome, Err(RelayError::Validation(_))));
    }
}
