//! Short numeric pairing token derived from the ECDH shared secret.
//!
//! ```text
//! shared = X25519(local_crypt_secret, peer_crypt_public)
//! digest = SHA-256("uc-pairing-token-v1" || shared)
//! token  = u64_be(digest[0..8]) mod 10^digits
//! ```
//!
//! Both sides compute the same shared secret, so both display the same token
//! unless someone in the middle substituted keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const TOKEN_DOMAIN: &[u8] = b"uc-pairing-token-v1";

pub const MIN_TOKEN_DIGITS: u32 = 4;
pub const MAX_TOKEN_DIGITS: u32 = 9;
pub const DEFAULT_TOKEN_DIGITS: u32 = 6;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairingToken {
    value: u32,
    digits: u32,
}

impl PairingToken {
    /// Derives a token of `digits` decimal digits (clamped to 4..=9).
    pub fn derive(shared_secret: &[u8], digits: u32) -> Self {
        let digits = digits.clamp(MIN_TOKEN_DIGITS, MAX_TOKEN_DIGITS);

        let mut hasher = Sha256::new();
        hasher.update(TOKEN_DOMAIN);
        hasher.update(shared_secret);
        let digest = hasher.finalize();

        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let modulus = 10u64.pow(digits);
        let value = (u64::from_be_bytes(head) % modulus) as u32;

        Self { value, digits }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Compares a user-entered token against this one in constant time.
    pub fn matches(&self, entered: u32) -> bool {
        self.value.to_be_bytes().ct_eq(&entered.to_be_bytes()).into()
    }
}

impl fmt::Display for PairingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.value, width = self.digits as usize)
    }
}

impl fmt::Debug for PairingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingToken")
            .field("digits", &self.digits)
            .field("value", &"[REDACTED]")
            .finish()
    }
}
