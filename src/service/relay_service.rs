//! Relay service: owns the shared device state and emits events.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::auth::DeviceGuard;
use crate::domain::{
    Command, CommandQueue, EventBus, HistoryBuffer, LedPatch, LedState, Liveness, LivenessStatus,
    Reading, ReadingPayload, RelayEvent, SubscriberId, SubscriberSet,
};
use crate::error::RelayError;

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Everything mutable, guarded by one lock.
#[derive(Debug)]
struct RelayStore {
    history: HistoryBuffer,
    latest: Option<Reading>,
    led: LedState,
    commands: CommandQueue,
    liveness: Liveness,
    subscribers: SubscriberSet,
}

/// Point-in-time view of the relay for the status endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayStatus {
    /// Device liveness.
    pub liveness: LivenessStatus,
    /// Connected push-channel clients.
    pub subscriber_count: usize,
    /// Seconds since the service was created.
    pub uptime_secs: f64,
    /// Commands waiting for the device.
    pub queue_depth: usize,
    /// Readings in history.
    pub history_len: usize,
}

/// Orchestration layer for ingest, history, LED control, and liveness.
///
/// Every mutation follows the pattern: check credential → acquire lock →
/// mutate store → publish events → release lock. Events are published
/// under the lock so subscribers observe them in mutation order;
/// publishing never blocks.
#[derive(Debug)]
pub struct RelayService {
    store: Mutex<RelayStore>,
    event_bus: EventBus,
    device_guard: DeviceGuard,
    silence_timeout: Duration,
    started: Instant,
}

impl RelayService {
    /// Creates a service with an empty history, default LED state, and a
    /// disconnected device whose last contact is `boot_ms`.
    #[must_use]
    pub fn new(
        event_bus: EventBus,
        device_guard: DeviceGuard,
        history_capacity: usize,
        silence_timeout: Duration,
        boot_ms: i64,
    ) -> Self {
        Self {
            store: Mutex::new(RelayStore {
                history: HistoryBuffer::new(history_capacity),
                latest: None,
                led: LedState::default(),
                commands: CommandQueue::new(),
                liveness: Liveness::new(boot_ms),
                subscribers: SubscriberSet::new(),
            }),
            event_bus,
            device_guard,
            silence_timeout,
            started: Instant::now(),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Stores the fixed boot reading as latest and in history without
    /// touching liveness.
    pub async fn seed_boot_reading(&self, now_ms: i64) {
        let reading = Reading::boot_seed(now_ms);
        let mut store = self.store.lock().await;
        store.history.push(reading.clone());
        store.latest = Some(reading);
        tracing::info!("initialized with simulated sensor data");
    }

    // ── Ingest & liveness ──────────────────────────────────────────────

    /// Checks a device credential without touching any state.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] on a missing or mismatched key.
    pub fn check_device(&self, credential: Option<&str>) -> Result<(), RelayError> {
        self.device_guard.check(credential)
    }

    /// Accepts a device-pushed reading and hands back all pending commands.
    ///
    /// Any authenticated push counts as device contact and drains the
    /// queue. A payload missing a measurement is not stored.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] on a bad credential; no state
    /// is touched.
    pub async fn submit_reading(
        &self,
        credential: Option<&str>,
        payload: ReadingPayload,
    ) -> Result<Vec<Command>, RelayError> {
        self.submit_reading_at(credential, payload, now_ms()).await
    }

    /// [`RelayService::submit_reading`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`RelayService::submit_reading`].
    pub async fn submit_reading_at(
        &self,
        credential: Option<&str>,
        payload: ReadingPayload,
        now_ms: i64,
    ) -> Result<Vec<Command>, RelayError> {
        self.device_guard.check(credential)?;

        let mut store = self.store.lock().await;
        match payload.into_reading(now_ms) {
            Ok(reading) => self.record_locked(&mut store, reading, now_ms),
            Err(err) => {
                tracing::warn!(error = %err, "device push without a complete reading");
                self.touch_locked(&mut store, now_ms);
            }
        }
        let pending = store.commands.drain();
        drop(store);

        tracing::debug!(delivered = pending.len(), "device pushed reading");
        Ok(pending)
    }

    /// Device poll: refreshes liveness and hands back all pending commands.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] on a bad credential.
    pub async fn poll_commands(&self, credential: Option<&str>) -> Result<Vec<Command>, RelayError> {
        self.poll_commands_at(credential, now_ms()).await
    }

    /// [`RelayService::poll_commands`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`RelayService::poll_commands`].
    pub async fn poll_commands_at(
        &self,
        credential: Option<&str>,
        now_ms: i64,
    ) -> Result<Vec<Command>, RelayError> {
        self.device_guard.check(credential)?;

        let mut store = self.store.lock().await;
        self.touch_locked(&mut store, now_ms);
        let pending = store.commands.drain();
        drop(store);

        tracing::debug!(delivered = pending.len(), "device polled commands");
        Ok(pending)
    }

    /// Records a reading that did not come through the device guard
    /// (simulator, proxy poll). Counts as device contact; does not drain
    /// the command queue.
    pub async fn record_reading(&self, reading: Reading, now_ms: i64) {
        let mut store = self.store.lock().await;
        self.record_locked(&mut store, reading, now_ms);
    }

    /// Marks the device disconnected after the silence window.
    ///
    /// Returns `true` if this call flipped the flag (and published an
    /// `esp-status` event).
    pub async fn sweep(&self) -> bool {
        self.sweep_at(now_ms()).await
    }

    /// [`RelayService::sweep`] with an explicit clock.
    pub async fn sweep_at(&self, now_ms: i64) -> bool {
        let mut store = self.store.lock().await;
        let flipped = store
            .liveness
            .sweep(now_ms, duration_ms(self.silence_timeout));
        if flipped {
            tracing::info!(
                last_contact = store.liveness.last_contact_ms(),
                "device connection timed out"
            );
            let _ = self
                .event_bus
                .publish(RelayEvent::EspStatus(store.liveness.status()));
        }
        flipped
    }

    fn record_locked(&self, store: &mut RelayStore, reading: Reading, now_ms: i64) {
        store.latest = Some(reading.clone());
        store.history.push(reading.clone());
        self.touch_locked(store, now_ms);
        let _ = self.event_bus.publish(RelayEvent::SensorUpdate(reading));
    }

    fn touch_locked(&self, store: &mut RelayStore, now_ms: i64) {
        if store.liveness.touch(now_ms) {
            tracing::info!("device connected");
            let _ = self
                .event_bus
                .publish(RelayEvent::EspStatus(store.liveness.status()));
        }
    }

    // ── History queries ────────────────────────────────────────────────

    /// Latest reading together with current liveness.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::NoReading`] if nothing was ever recorded.
    pub async fn latest(&self) -> Result<(Reading, LivenessStatus), RelayError> {
        let store = self.store.lock().await;
        let reading = store.latest.clone().ok_or(RelayError::NoReading)?;
        Ok((reading, store.liveness.status()))
    }

    /// Full history, or only readings newer than `window` when given.
    pub async fn history(&self, window: Option<Duration>) -> Vec<Reading> {
        self.history_at(window, now_ms()).await
    }

    /// [`RelayService::history`] with an explicit clock.
    pub async fn history_at(&self, window: Option<Duration>, now_ms: i64) -> Vec<Reading> {
        let store = self.store.lock().await;
        match window {
            Some(window) => store
                .history
                .since(now_ms.saturating_sub(duration_ms(window))),
            None => store.history.all(),
        }
    }

    // ── LED control ────────────────────────────────────────────────────

    /// Merges `patch` into the LED state, queues the merged state for the
    /// device, and broadcasts it. Returns the merged state.
    pub async fn set_led(&self, patch: &LedPatch) -> LedState {
        let mut store = self.store.lock().await;
        store.led.merge(patch);
        let merged = store.led.clone();
        store.commands.enqueue(Command::Led(merged.clone()));
        let _ = self
            .event_bus
            .publish(RelayEvent::LedUpdate(merged.clone()));
        tracing::info!(
            r = merged.r,
            g = merged.g,
            b = merged.b,
            brightness = merged.brightness,
            effect = %merged.effect,
            queued = store.commands.len(),
            "led command queued for device"
        );
        merged
    }

    /// Merges `patch` into the local LED mirror and broadcasts it without
    /// queueing a command (the device was already told directly).
    pub async fn mirror_led(&self, patch: &LedPatch) -> LedState {
        let mut store = self.store.lock().await;
        store.led.merge(patch);
        let merged = store.led.clone();
        let _ = self
            .event_bus
            .publish(RelayEvent::LedUpdate(merged.clone()));
        merged
    }

    /// Current LED state.
    pub async fn led_status(&self) -> LedState {
        self.store.lock().await.led.clone()
    }

    // ── Subscribers & status ───────────────────────────────────────────

    /// Registers a push-channel client.
    pub async fn register_subscriber(&self) -> SubscriberId {
        let id = SubscriberId::new();
        self.store.lock().await.subscribers.insert(id);
        id
    }

    /// Forgets a push-channel client.
    pub async fn unregister_subscriber(&self, id: SubscriberId) {
        self.store.lock().await.subscribers.remove(id);
    }

    /// Events a newly connected client receives before live updates.
    ///
    /// Empty until a reading exists.
    pub async fn snapshot_events(&self) -> Vec<RelayEvent> {
        let store = self.store.lock().await;
        let Some(latest) = store.latest.clone() else {
            return Vec::new();
        };
        vec![
            RelayEvent::SensorUpdate(latest),
            RelayEvent::LedUpdate(store.led.clone()),
            RelayEvent::EspStatus(store.liveness.status()),
        ]
    }

    /// Liveness, client count, uptime, and queue depth.
    pub async fn status(&self) -> RelayStatus {
        let store = self.store.lock().await;
        RelayStatus {
            liveness: store.liveness.status(),
            subscriber_count: store.subscribers.len(),
            uptime_secs: self.started.elapsed().as_secs_f64(),
            queue_depth: store.commands.len(),
            history_len: store.history.len(),
        }
    }
}
