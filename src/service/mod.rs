//! Service layer: business logic orchestration.
//!
//! [`RelayService`] owns the device state and emits events through the
//! [`super::domain::EventBus`]; [`AuthService`] handles operator sessions;
//! [`ProxyService`] talks to the device's own HTTP server in proxy mode.

pub mod auth_service;
pub mod liveness_task;
pub mod proxy_service;
pub mod relay_service;

pub use auth_service::{AuthService, LoginGrant};
pub use liveness_task::spawn_liveness_sweeper;
pub use proxy_service::{DeviceClient, ProxyService};
pub use relay_service::{RelayService, RelayStatus, now_ms};
