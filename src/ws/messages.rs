//! Push-channel frames.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! Server-to-client relay events are [`RelayEvent`](crate::domain::RelayEvent)
//! values; this module holds the client-to-server commands and the error
//! frame.

use serde::{Deserialize, Serialize};

use crate::domain::LedPatch;
use crate::error::RelayError;

/// Commands a client can send over the push channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Partial LED update, handled like `POST /api/led`.
    SetLed(LedPatch),
}

impl ClientMessage {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] for malformed JSON or an unknown
    /// event name.
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        serde_json::from_str(text)
            .map_err(|e| RelayError::Validation(format!("malformed frame: {e}")))
    }
}

/// Payload of an `error` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WsError {
    /// Numeric error code, same ranges as the REST error body.
    pub code: u32,
    /// Human-readable message.
    pub message: String,
}

/// Server-to-client frames that are not relay events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// A client frame was rejected.
    Error(WsError),
}

impl From<&RelayError> for ServerMessage {
    fn from(err: &RelayError) -> Self {
        Self::Error(WsError {
            code: err.error_code(),
            message: err.to_string(),
        })
    }
}
