//! Identity fingerprint generation
//!
//! 设备身份指纹: a stable, human-comparable rendering of a peer's public key,
//! shown next to trusted devices so a user can tell two records apart.
//!
//! ```text
//! fingerprint_raw     = SHA-256("uc-identity-fp-v1" || public_key)
//! fingerprint_display = Base32(fingerprint_raw[0..10]) -> "ABCD-EFGH-IJKL-MNOP"
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("Invalid input length: expected at least {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityFingerprint(String);

impl IdentityFingerprint {
    const GROUP_SIZE: usize = 4;

    fn from_digest(bytes: &[u8]) -> Result<Self, FingerprintError> {
        if bytes.len() < 10 {
            return Err(FingerprintError::InvalidLength {
                expected: 10,
                actual: bytes.len(),
            });
        }

        let encoded = base32::encode(base32::Alphabet::Rfc4648 { padding: false }, &bytes[..10]);
        Ok(Self(Self::format_with_groups(&encoded)))
    }

    /// Fingerprint of a raw public key (any kind).
    pub fn from_public_key(public_key: &[u8]) -> Result<Self, FingerprintError> {
        if public_key.is_empty() {
            return Err(FingerprintError::InvalidLength {
                expected: 1,
                actual: 0,
            });
        }
        let mut hasher = Sha256::new();
        hasher.update(b"uc-identity-fp-v1");
        hasher.update(public_key);
        Self::from_digest(&hasher.finalize())
    }

    fn format_with_groups(encoded: &str) -> String {
        encoded
            .as_bytes()
            .chunks(Self::GROUP_SIZE)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn as_display(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_from_public_key() {
        let fp = IdentityFingerprint::from_public_key(&[0u8; 32]).unwrap();

        let display = fp.as_display();
        assert_eq!(display.chars().filter(|&c| c == '-').count(), 3);
        assert_eq!(display.replace('-', "").len(), 16);
    }

    #[test]
    fn test_fingerprint_is_stable_per_key() {
        let a = IdentityFingerprint::from_public_key(&[1u8; 32]).unwrap();
        let b = IdentityFingerprint::from_public_key(&[1u8; 32]).unwrap();
        let c = IdentityFingerprint::from_public_key(&[2u8; 32]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fingerprint_invalid_inputs() {
        assert!(IdentityFingerprint::from_public_key(&[]).is_err());
    }
}
