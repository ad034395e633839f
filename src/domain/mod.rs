//! Domain layer: readings, LED state, command queue, liveness, and events.
//!
//! This module contains the relay's in-memory model: the bounded reading
//! history, the LED singleton with its merge rule, the pending-command
//! queue drained by device contacts, the liveness tracker, and the event
//! bus that fans state changes out to web clients.

pub mod command;
pub mod event_bus;
pub mod history;
pub mod led_state;
pub mod liveness;
pub mod reading;
pub mod relay_event;
pub mod subscribers;

pub use command::{Command, CommandQueue};
pub use event_bus::EventBus;
pub use history::HistoryBuffer;
pub use led_state::{LedPatch, LedState};
pub use liveness::{Liveness, LivenessStatus};
pub use reading::{Reading, ReadingPayload};
pub use relay_event::RelayEvent;
pub use subscribers::{SubscriberId, SubscriberSet};
