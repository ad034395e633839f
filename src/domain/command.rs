//! Outbound device commands and the pending-command queue.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::LedState;

/// An instruction awaiting delivery to the device.
///
/// Serialized as `{"type": "led", "data": {...}}`, the shape the firmware
/// parses out of `pendingCommands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Command {
    /// Apply the full LED state.
    Led(LedState),
}

/// FIFO of commands waiting for the next device contact.
///
/// Delivery is at-most-once: [`CommandQueue::drain`] hands out every
/// pending command and forgets them.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command. No coalescing.
    pub fn enqueue(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Removes and returns all pending commands in enqueue order.
    pub fn drain(&mut self) -> Vec<Command> {
        self.pending.drain(..).collect()
    }

    /// Number of commands waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn led(r: u8) -> Command {
        Command::Led(LedState {
            r,
            ..LedState::default()
        })
    }

    #[test]
    fn drain_returns_in_order_then_empty() {
        let mut queue = CommandQueue::new();
        queue.enqueue(led(1));
        queue.enqueue(led(2));

        assert_eq!(queue.drain(), vec![led(1), led(2)]);
        assert!(queue.drain().is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn enqueue_after_drain_is_kept() {
        let mut queue = CommandQueue::new();
        queue.enqueue(led(1));
        let _ = queue.drain();
        queue.enqueue(led(2));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain(), vec![led(2)]);
    }

    #[test]
    fn serializes_in_firmware_shape() {
        let json = serde_json::to_value(led(7)).unwrap_or_default();
        assert_eq!(json["type"], "led");
        assert_eq!(json["data"]["r"], 7);
        assert_eq!(json["data"]["effect"], "solid");
    }
}
