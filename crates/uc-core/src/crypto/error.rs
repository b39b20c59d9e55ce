use thiserror::Error;

use super::KeyKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Bytes do not decode to a valid public key on the configured curve.
    #[error("malformed {kind} public key: {reason}")]
    MalformedKey { kind: KeyKind, reason: String },

    #[error("malformed secret key material: {0}")]
    MalformedSecret(String),

    #[error("malformed signature")]
    MalformedSignature,

    #[error("signature verification failed")]
    BadSignature,

    /// Peer public key is a low-order point; the shared secret carries no entropy.
    #[error("key exchange produced a non-contributory shared secret")]
    NonContributory,

    #[error("encryption failed")]
    EncryptFailed,

    /// Ciphertext failed integrity verification.
    #[error("authentication failed")]
    AuthenticationFailed,
}

impl CryptoError {
    pub(crate) fn malformed(kind: KeyKind, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            kind,
            reason: reason.into(),
        }
    }
}
