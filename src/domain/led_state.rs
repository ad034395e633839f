//! LED state singleton and the partial-update merge rule.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Full LED state: color, brightness, and effect name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LedState {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Overall brightness.
    pub brightness: u8,
    /// Effect name understood by the firmware (`solid`, `blink`, `breathe`, `rainbow`).
    pub effect: String,
}

impl Default for LedState {
    fn default() -> Self {
        Self {
            r: 0,
            g: 150,
            b: 0,
            brightness: 128,
            effect: "solid".to_string(),
        }
    }
}

impl LedState {
    /// Applies a partial update.
    ///
    /// Each field present in `patch` overwrites the stored value; absent
    /// fields are left untouched.
    pub fn merge(&mut self, patch: &LedPatch) {
        if let Some(r) = patch.r {
            self.r = r;
        }
        if let Some(g) = patch.g {
            self.g = g;
        }
        if let Some(b) = patch.b {
            self.b = b;
        }
        if let Some(brightness) = patch.brightness {
            self.brightness = brightness;
        }
        if let Some(effect) = &patch.effect {
            self.effect.clone_from(effect);
        }
    }
}

/// Partial LED update as sent by web clients; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LedPatch {
    /// Red channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u8>,
    /// Green channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<u8>,
    /// Blue channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<u8>,
    /// Overall brightness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// Effect name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}
