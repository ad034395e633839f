//! Background liveness sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::RelayService;

/// Spawns the periodic sweep that marks a silent device disconnected.
///
/// Runs every `period` until `shutdown` flips to `true` or its sender is
/// dropped. The first sweep happens one full period after spawn.
pub fn spawn_liveness_sweeper(
    service: Arc<RelayService>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let _ = service.sweep().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("liveness sweeper stopped");
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::DeviceGuard;
    use crate::domain::{EventBus, RelayEvent};

    #[tokio::test]
    async fn sweeper_flags_silent_device_and_stops_on_shutdown() {
        let service = Arc::new(RelayService::new(
            EventBus::new(16),
            DeviceGuard::open(),
            10,
            Duration::ZERO,
            0,
        ));
        let _ = service.poll_commands(None).await;
        let mut rx = service.event_bus().subscribe();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_liveness_sweeper(
            Arc::clone(&service),
            Duration::from_millis(20),
            shutdown_rx,
        );

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        let Ok(Ok(RelayEvent::EspStatus(status))) = event else {
            panic!("expected esp-status from the sweeper");
        };
        assert!(!status.connected);

        let _ = shutdown_tx.send(true);
        let stopped = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(matches!(stopped, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn dropping_the_sender_stops_the_sweeper() {
        let service = Arc::new(RelayService::new(
            EventBus::new(16),
            DeviceGuard::open(),
            10,
            Duration::from_secs(120),
            0,
        ));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_liveness_sweeper(service, Duration::from_secs(30), shutdown_rx);
        drop(shutdown_tx);
        let stopped = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(matches!(stopped, Ok(Ok(()))));
    }
}
