//! # sensor-relay
//!
//! HTTP and WebSocket relay between a single temperature/humidity/LED
//! device and any number of web clients.
//!
//! The device pushes readings and polls for queued LED commands; web
//! clients read the latest reading and history, change the LED, and get
//! live updates over a WebSocket. In proxy mode the relay instead calls
//! the device's own embedded HTTP server.
//!
//! ## Architecture
//!
//! ```text
//! Device (HTTP push/poll)      Web clients (HTTP, WebSocket)
//!     │                              │
//!     ├── REST Handlers (api/) ──────┤
//!     │                              ├── WS Handler (ws/)
//!     │                              │
//!     ├── RelayService / AuthService / ProxyService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── RelayStore: history, command queue, LED, liveness (domain/)
//!     └── DeviceClient ──► device HTTP server (proxy mode)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
