//! Events pushed to web clients.
//!
//! Every state change visible to browsers emits a [`RelayEvent`] through
//! the [`super::EventBus`]. The serialized form is the push-channel frame:
//! `{"event": "sensor-update", "data": {...}}`.

use serde::Serialize;

use super::{LedState, LivenessStatus, Reading};

/// Server-to-client push event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum RelayEvent {
    /// A new reading was recorded.
    SensorUpdate(Reading),
    /// The LED state changed.
    LedUpdate(LedState),
    /// Device liveness changed.
    EspStatus(LivenessStatus),
}

impl RelayEvent {
    /// Returns the event name as a static string slice.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::SensorUpdate(_) => "sensor-update",
            Self::LedUpdate(_) => "led-update",
            Self::EspStatus(_) => "esp-status",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn esp_status_frame_shape() {
        let event = RelayEvent::EspStatus(LivenessStatus {
            connected: false,
            last_contact: 5,
        });
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["event"], "esp-status");
        assert_eq!(json["data"]["connected"], false);
        assert_eq!(json["data"]["lastContact"], 5);
        assert_eq!(event.event_name(), "esp-status");
    }

    #[test]
    fn led_update_frame_shape() {
        let event = RelayEvent::LedUpdate(LedState::default());
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["event"], "led-update");
        assert_eq!(json["data"]["g"], 150);
    }
}
