//! Salted PBKDF2-HMAC-SHA-256 password hashes.

use rand::RngCore;
use sha2::Sha256;

use super::crypto::{b64url_encode, secure_compare};

/// PBKDF2 iteration count.
const ROUNDS: u32 = 10_000;

const SALT_LEN: usize = 16;

const DIGEST_LEN: usize = 32;

/// Stored password digest plus its per-account salt.
#[derive(Clone)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: [u8; DIGEST_LEN],
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHash")
            .field("salt", &b64url_encode(&self.salt))
            .finish_non_exhaustive()
    }
}

impl PasswordHash {
    /// Hashes `password` under a fresh random salt.
    #[must_use]
    pub fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);
        let digest = derive(&salt, password);
        Self { salt, digest }
    }

    /// Returns `true` if `candidate` hashes to the stored digest.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        secure_compare(&derive(&self.salt, candidate), &self.digest)
    }
}

fn derive(salt: &[u8], password: &str) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ROUNDS, &mut digest);
    digest
}
