//! Device liveness: last contact time and the derived connected flag.

use serde::Serialize;
use utoipa::ToSchema;

/// Connected/disconnected status derived from contact recency.
#[derive(Debug, Clone, Copy)]
pub struct Liveness {
    last_contact_ms: i64,
    connected: bool,
}

impl Liveness {
    /// Starts disconnected, with the clock at `boot_ms`.
    #[must_use]
    pub const fn new(boot_ms: i64) -> Self {
        Self {
            last_contact_ms: boot_ms,
            connected: false,
        }
    }

    /// Records an authenticated device contact.
    ///
    /// Returns `true` if this contact flipped the device back to connected.
    pub fn touch(&mut self, now_ms: i64) -> bool {
        let was_connected = self.connected;
        self.last_contact_ms = now_ms;
        self.connected = true;
        !was_connected
    }

    /// Marks the device disconnected if it has been silent for more than
    /// `timeout_ms` while flagged connected.
    ///
    /// Returns `true` only on the flip; repeated sweeps stay quiet.
    pub fn sweep(&mut self, now_ms: i64, timeout_ms: i64) -> bool {
        if self.connected && now_ms.saturating_sub(self.last_contact_ms) > timeout_ms {
            self.connected = false;
            return true;
        }
        false
    }

    /// Whether the device is currently presumed connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Time of the last contact, epoch milliseconds.
    #[must_use]
    pub const fn last_contact_ms(&self) -> i64 {
        self.last_contact_ms
    }

    /// Wire snapshot of the current status.
    #[must_use]
    pub const fn status(&self) -> LivenessStatus {
        LivenessStatus {
            connected: self.connected,
            last_contact: self.last_contact_ms,
        }
    }
}

/// Liveness as sent to web clients in `esp-status` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LivenessStatus {
    /// Whether the device is presumed connected.
    pub connected: bool,
    /// Time of the last contact, epoch milliseconds.
    pub last_contact: i64,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const TIMEOUT: i64 = 120_000;

    #[test]
    fn starts_disconnected() {
        let liveness = Liveness::new(1_000);
        assert!(!liveness.is_connected());
        assert_eq!(liveness.last_contact_ms(), 1_000);
    }

    #[test]
    fn sweep_waits_for_the_full_timeout() {
        let mut liveness = Liveness::new(0);
        liveness.touch(0);
        assert!(!liveness.sweep(TIMEOUT, TIMEOUT));
        assert!(liveness.is_connected());
        assert!(liveness.sweep(TIMEOUT + 1, TIMEOUT));
        assert!(!liveness.is_connected());
    }

    #[test]
    fn sweep_fires_once() {
        let mut liveness = Liveness::new(0);
        liveness.touch(0);
        assert!(liveness.sweep(TIMEOUT * 2, TIMEOUT));
        assert!(!liveness.sweep(TIMEOUT * 3, TIMEOUT));
    }

    #[test]
    fn never_connected_device_is_not_swept() {
        let mut liveness = Liveness::new(0);
        assert!(!liveness.sweep(TIMEOUT * 10, TIMEOUT));
    }

    #[test]
    fn contact_reconnects() {
        let mut liveness = Liveness::new(0);
        liveness.touch(0);
        let _ = liveness.sweep(TIMEOUT * 2, TIMEOUT);
        assert!(liveness.touch(TIMEOUT * 2 + 5));
        assert!(liveness.is_connected());
        assert!(!liveness.touch(TIMEOUT * 2 + 6));
    }
}
