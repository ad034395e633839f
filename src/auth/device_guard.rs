//! Shared-secret check for device-facing endpoints.

use super::crypto::secure_compare;
use crate::error::RelayError;

/// Header carrying the device credential.
pub const DEVICE_KEY_HEADER: &str = "x-api-key";

/// Compares the credential presented by the device with the configured
/// shared secret. An open guard accepts everything.
#[derive(Clone)]
pub struct DeviceGuard {
    expected: Option<String>,
}

impl std::fmt::Debug for DeviceGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceGuard")
            .field("enforced", &self.expected.is_some())
            .finish()
    }
}

impl DeviceGuard {
    /// Guard that requires exactly `secret`.
    #[must_use]
    pub fn shared_secret(secret: impl Into<String>) -> Self {
        Self {
            expected: Some(secret.into()),
        }
    }

    /// Guard that lets every request through.
    #[must_use]
    pub const fn open() -> Self {
        Self { expected: None }
    }

    /// Checks a presented credential.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] if the guard is enforced and the
    /// credential is missing or differs from the secret.
    pub fn check(&self, presented: Option<&str>) -> Result<(), RelayError> {
        let Some(expected) = &self.expected else {
            return Ok(());
        };
        match presented {
            Some(key) if secure_compare(key.as_bytes(), expected.as_bytes()) => Ok(()),
            _ => {
                tracing::warn!("rejected device request with bad api key");
                Err(RelayError::Unauthorized("invalid device API key".to_string()))
            }
        }
    }
}
