//! Fan-out of relay events to push-channel clients.

use tokio::sync::broadcast;

use super::RelayEvent;

/// Bounded broadcast of [`RelayEvent`]s to every connected web client.
///
/// The relay publishes while holding its store lock, so publishing must
/// never wait: a client that falls more than `capacity` events behind
/// loses the oldest ones and sees `RecvError::Lagged` on its next read.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RelayEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per client
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `event` to every connected client and returns how many
    /// received it. With no clients connected the event is discarded.
    pub fn publish(&self, event: RelayEvent) -> usize {
        let name = event.event_name();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event = name, clients = delivered, "relay event published");
        delivered
    }

    /// Registers a new client; it sees only events published afterwards.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{LedState, LivenessStatus};

    fn led(r: u8) -> RelayEvent {
        RelayEvent::LedUpdate(LedState {
            r,
            ..LedState::default()
        })
    }

    #[test]
    fn event_without_clients_is_discarded() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(led(1)), 0);

        // A late subscriber does not see earlier events.
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_client_sees_events_in_publish_order() {
        let bus = EventBus::new(16);
        let mut browser = bus.subscribe();
        let mut dashboard = bus.subscribe();

        let offline = RelayEvent::EspStatus(LivenessStatus {
            connected: false,
            last_contact: 7,
        });
        assert_eq!(bus.publish(led(9)), 2);
        assert_eq!(bus.publish(offline), 2);

        for rx in [&mut browser, &mut dashboard] {
            let Ok(RelayEvent::LedUpdate(state)) = rx.recv().await else {
                panic!("led-update expected first");
            };
            assert_eq!(state.r, 9);
            let Ok(RelayEvent::EspStatus(status)) = rx.recv().await else {
                panic!("esp-status expected second");
            };
            assert!(!status.connected);
        }
    }

    #[tokio::test]
    async fn slow_client_lags_instead_of_blocking() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();

        for r in 0..5 {
            bus.publish(led(r));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        let Ok(RelayEvent::LedUpdate(next)) = rx.recv().await else {
            panic!("expected the oldest retained event");
        };
        assert_eq!(next.r, 3);
    }
}
