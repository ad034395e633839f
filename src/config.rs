//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key has a default so the relay
//! starts with no configuration at all.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Development-only signing secret used when `SESSION_SECRET` is unset.
pub const DEFAULT_SESSION_SECRET: &str = "sensor-relay-dev-secret";

/// Errors raised while loading [`RelayConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` (or the address built from `PORT`) is not a socket address.
    #[error("invalid listen address {0:?}")]
    ListenAddr(String),

    /// An enumerated setting holds an unsupported value.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Environment key.
        key: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A capacity setting is zero.
    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),
}

/// Which server variant the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// The device pushes readings and polls for commands.
    Push,
    /// The relay polls the device's own embedded HTTP server.
    Proxy,
}

impl FromStr for RelayMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "push" => Ok(Self::Push),
            "proxy" => Ok(Self::Proxy),
            _ => Err(()),
        }
    }
}

/// Which access guards are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// No guard at all.
    None,
    /// Device shared secret on device endpoints only.
    Device,
    /// Device guard plus operator login for LED control and admin endpoints.
    Full,
}

impl AuthMode {
    /// Returns `true` if device endpoints check the shared secret.
    #[must_use]
    pub const fn guards_device(self) -> bool {
        matches!(self, Self::Device | Self::Full)
    }

    /// Returns `true` if operator login and session tokens are in force.
    #[must_use]
    pub const fn guards_operator(self) -> bool {
        matches!(self, Self::Full)
    }
}

impl FromStr for AuthMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "device" => Ok(Self::Device),
            "full" => Ok(Self::Full),
            _ => Err(()),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Push (device calls in) or proxy (relay calls out) variant.
    pub relay_mode: RelayMode,

    /// Which access guards are enforced.
    pub auth_mode: AuthMode,

    /// Shared secret the device sends in `X-API-Key`.
    pub device_api_key: String,

    /// HMAC key for operator session tokens.
    pub session_secret: String,

    /// Lifetime of an operator session token.
    pub session_ttl: Duration,

    /// Bootstrap admin account name.
    pub admin_username: String,

    /// Bootstrap admin account password (hashed at startup).
    pub admin_password: String,

    /// Silence after which the device is presumed disconnected.
    pub silence_timeout: Duration,

    /// Period of the liveness sweep.
    pub sweep_interval: Duration,

    /// Maximum number of readings kept in history.
    pub history_capacity: usize,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Seed one simulated reading at boot so `/api/sensor-data` has data.
    pub seed_simulated_reading: bool,

    /// Base URL of the device's embedded HTTP server (proxy mode).
    pub device_base_url: String,

    /// Timeout applied to every proxied request.
    pub device_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            relay_mode: RelayMode::Push,
            auth_mode: AuthMode::Device,
            device_api_key: "123456789".to_string(),
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_ttl: Duration::from_secs(86_400),
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            silence_timeout: Duration::from_secs(120),
            sweep_interval: Duration::from_secs(30),
            history_capacity: 1000,
            event_bus_capacity: 256,
            seed_simulated_reading: true,
            device_base_url: "http://192.168.232.67".to_string(),
            device_timeout: Duration::from_millis(5000),
            log_format: LogFormat::Pretty,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the listen address, a mode, or the log
    /// format cannot be parsed, or if a capacity is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_raw = lookup("LISTEN_ADDR").unwrap_or_else(|| {
            let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
            format!("0.0.0.0:{port}")
        });
        let listen_addr: SocketAddr = listen_raw
            .parse()
            .map_err(|_| ConfigError::ListenAddr(listen_raw.clone()))?;

        let relay_mode = parse_enum(&lookup, "RELAY_MODE", defaults.relay_mode)?;
        let auth_mode = parse_enum(&lookup, "AUTH_MODE", defaults.auth_mode)?;
        let log_format = parse_enum(&lookup, "LOG_FORMAT", defaults.log_format)?;

        let history_capacity = parse_env(&lookup, "HISTORY_CAPACITY", defaults.history_capacity);
        if history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("HISTORY_CAPACITY"));
        }
        let event_bus_capacity =
            parse_env(&lookup, "EVENT_BUS_CAPACITY", defaults.event_bus_capacity);
        if event_bus_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("EVENT_BUS_CAPACITY"));
        }

        Ok(Self {
            listen_addr,
            relay_mode,
            auth_mode,
            device_api_key: lookup("DEVICE_API_KEY").unwrap_or(defaults.device_api_key),
            session_secret: lookup("SESSION_SECRET").unwrap_or(defaults.session_secret),
            session_ttl: Duration::from_secs(parse_env(&lookup, "SESSION_TTL_SECS", 86_400)),
            admin_username: lookup("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            silence_timeout: Duration::from_secs(parse_env(&lookup, "SILENCE_TIMEOUT_SECS", 120)),
            sweep_interval: Duration::from_secs(
                parse_env(&lookup, "SWEEP_INTERVAL_SECS", 30).max(1),
            ),
            history_capacity,
            event_bus_capacity,
            seed_simulated_reading: parse_env_bool(&lookup, "SEED_SIMULATED_READING", true),
            device_base_url: lookup("DEVICE_BASE_URL").unwrap_or(defaults.device_base_url),
            device_timeout: Duration::from_millis(parse_env(&lookup, "DEVICE_TIMEOUT_MS", 5000)),
            log_format,
        })
    }

    /// Returns `true` if the session secret is still the built-in default.
    #[must_use]
    pub fn uses_default_session_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

/// Parses an enumerated setting; unlike numbers, a bad value is an error.
fn parse_enum<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<RelayConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RelayConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let Ok(config) = load(&[]) else {
            panic!("defaults must load");
        };
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.relay_mode, RelayMode::Push);
        assert_eq!(config.auth_mode, AuthMode::Device);
        assert_eq!(config.silence_timeout, Duration::from_secs(120));
        assert_eq!(config.history_capacity, 1000);
        assert!(config.uses_default_session_secret());
    }

    #[test]
    fn port_is_used_when_listen_addr_missing() {
        let Ok(config) = load(&[("PORT", "8080")]) else {
            panic!("port must parse");
        };
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn modes_parse_case_insensitively() {
        let Ok(config) = load(&[("RELAY_MODE", "Proxy"), ("AUTH_MODE", "FULL")]) else {
            panic!("modes must parse");
        };
        assert_eq!(config.relay_mode, RelayMode::Proxy);
        assert!(config.auth_mode.guards_operator());
        assert!(config.auth_mode.guards_device());
    }

    #[test]
    fn unknown_auth_mode_is_rejected() {
        let result = load(&[("AUTH_MODE", "sometimes")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "AUTH_MODE",
                ..
            })
        ));
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let Ok(config) = load(&[("SILENCE_TIMEOUT_SECS", "soon")]) else {
            panic!("bad numbers must not fail");
        };
        assert_eq!(config.silence_timeout, Duration::from_secs(120));
    }

    #[test]
    fn zero_history_capacity_is_rejected() {
        assert!(matches!(
            load(&[("HISTORY_CAPACITY", "0")]),
            Err(ConfigError::ZeroCapacity("HISTORY_CAPACITY"))
        ));
    }

    #[test]
    fn invalid_listen_addr_is_rejected() {
        assert!(matches!(
            load(&[("LISTEN_ADDR", "not-an-addr")]),
            Err(ConfigError::ListenAddr(_))
        ));
    }
}
