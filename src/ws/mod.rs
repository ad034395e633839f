//! WebSocket layer: connection handling and frame types.
//!
//! The endpoint at `/ws` pushes `sensor-update`, `led-update`, and
//! `esp-status` events to every client and accepts `set-led` commands.

pub mod connection;
pub mod handler;
pub mod messages;
