//! HS256 JSON Web Tokens for operator sessions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Role;
use super::crypto::{b64url_decode, b64url_encode, hmac_sha256, secure_compare};
use crate::error::RelayError;

/// Compact-serialized `{"alg":"HS256","typ":"JWT"}`.
const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// Role granted at login.
    pub role: Role,
    /// Issued-at, epoch seconds.
    pub iat: i64,
    /// Expiry, epoch seconds.
    pub exp: i64,
}

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// Issues and verifies session tokens signed with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Creates a signer; tokens expire `ttl` after issue.
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl,
        }
    }

    /// Issues a token for `username` with `role`, valid from `now_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] if the claims cannot be encoded or
    /// signed.
    pub fn issue(&self, username: &str, role: Role, now_secs: i64) -> Result<String, RelayError> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: username.to_string(),
            role,
            iat: now_secs,
            exp: now_secs.saturating_add(ttl),
        };
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| RelayError::Internal(e.to_string()))?;
        let signing_input = format!(
            "{}.{}",
            b64url_encode(HEADER_JSON.as_bytes()),
            b64url_encode(&claims_json)
        );
        let signature = hmac_sha256(&self.secret, signing_input.as_bytes())?;
        Ok(format!("{signing_input}.{}", b64url_encode(&signature)))
    }

    /// Verifies signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] if the token is malformed, uses
    /// another algorithm, carries a bad signature, or has expired.
    pub fn verify(&self, token: &str, now_secs: i64) -> Result<Claims, RelayError> {
        let invalid = || RelayError::Unauthorized("invalid session token".to_string());

        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let header_bytes = b64url_decode(header_b64).ok_or_else(invalid)?;
        let header: Header = serde_json::from_slice(&header_bytes).map_err(|_| invalid())?;
        if header.alg != "HS256" {
            return Err(invalid());
        }

        let signature = b64url_decode(signature_b64).ok_or_else(invalid)?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        let expected = hmac_sha256(&self.secret, signing_input.as_bytes())?;
        if !secure_compare(&signature, &expected) {
            return Err(invalid());
        }

        let claims_bytes = b64url_decode(claims_b64).ok_or_else(invalid)?;
        let claims: Claims = serde_json::from_slice(&claims_bytes).map_err(|_| invalid())?;
        if claims.exp <= now_secs {
            return Err(RelayError::Unauthorized("session token expired".to_string()));
        }
        Ok(claims)
    }
}
