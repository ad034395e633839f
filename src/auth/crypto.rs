//! HMAC, constant-time comparison, and base64url helpers shared by the
//! device guard, password hashing, and session tokens.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::RelayError;

type HmacSha256 = Hmac<Sha256>;

/// Computes HMAC-SHA-256 over `data`.
///
/// # Errors
///
/// Returns [`RelayError::Internal`] if the MAC cannot be keyed. HMAC
/// accepts keys of any length, so this does not happen in practice.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, RelayError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| RelayError::Internal(format!("hmac key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time comparison of two byte strings.
///
/// Returns `true` only when both length and content match.
#[must_use]
pub fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

/// Encodes bytes as URL-safe base64 without padding.
#[must_use]
pub fn b64url_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(data)
}

/// Decodes URL-safe base64 without padding. Returns `None` on invalid input.
#[must_use]
pub fn b64url_decode(data: &str) -> Option<Vec<u8>> {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(data)
        .ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn hmac_matches_rfc4231_case_2() {
        let Ok(mac) = hmac_sha256(b"Jefe", b"what do ya want for nothing?") else {
            panic!("hmac failed");
        };
        let hex: String = mac.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn secure_compare_checks_length_and_content() {
        assert!(secure_compare(b"abc", b"abc"));
        assert!(!secure_compare(b"abc", b"abd"));
        assert!(!secure_compare(b"abc", b"abcd"));
    }

    #[test]
    fn b64url_round_trip_without_padding() {
        let encoded = b64url_encode(b"\xfb\xff");
        assert_eq!(encoded, "-_8");
        assert_eq!(b64url_decode(&encoded), Some(b"\xfb\xff".to_vec()));
        assert_eq!(b64url_decode("not base64!"), None);
    }
}
