//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::DeviceGuard;
use crate::config::{RelayConfig, RelayMode};
use crate::domain::EventBus;
use crate::error::RelayError;
use crate::service::{AuthService, DeviceClient, ProxyService, RelayService, now_ms};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service for ingest, history, LED control, and liveness.
    pub relay_service: Arc<RelayService>,
    /// Operator login and session verification.
    pub auth_service: Arc<AuthService>,
    /// Device HTTP proxy; present only in proxy mode.
    pub proxy_service: Option<Arc<ProxyService>>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Configuration the state was built from.
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Builds every service from configuration.
    ///
    /// Seeds the boot reading when configured.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] if the device HTTP client cannot be
    /// built.
    pub async fn from_config(config: RelayConfig) -> Result<Self, RelayError> {
        let event_bus = EventBus::new(config.event_bus_capacity);

        let device_guard = if config.auth_mode.guards_device() {
            DeviceGuard::shared_secret(&*config.device_api_key)
        } else {
            DeviceGuard::open()
        };

        let now = now_ms();
        let relay_service = Arc::new(RelayService::new(
            event_bus.clone(),
            device_guard,
            config.history_capacity,
            config.silence_timeout,
            now,
        ));
        if config.seed_simulated_reading {
            relay_service.seed_boot_reading(now).await;
        }

        let auth_service = Arc::new(AuthService::from_config(&config));

        let proxy_service = match config.relay_mode {
            RelayMode::Proxy => {
                let client = DeviceClient::new(&config.device_base_url, config.device_timeout)?;
                Some(Arc::new(ProxyService::new(
                    client,
                    Arc::clone(&relay_service),
                )))
            }
            RelayMode::Push => None,
        };

        Ok(Self {
            relay_service,
            auth_service,
            proxy_service,
            event_bus,
            config: Arc::new(config),
        })
    }

    /// Returns the proxy service.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] when not running in proxy mode.
    pub fn proxy(&self) -> Result<&Arc<ProxyService>, RelayError> {
        self.proxy_service
            .as_ref()
            .ok_or_else(|| RelayError::Internal("proxy mode is not enabled".to_string()))
    }
}
