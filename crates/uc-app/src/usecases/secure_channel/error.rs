use thiserror::Error;
use uc_core::crypto::CryptoError;
use uc_core::ports::TrustStoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecureChannelError {
    /// No trust record for the peer; the caller must re-pair, never retry.
    #[error("peer {0} is not trusted")]
    UntrustedPeer(String),

    #[error("stored key for peer is malformed: {0}")]
    MalformedKey(String),

    #[error("ciphertext failed integrity verification")]
    AuthenticationFailed,

    #[error("encryption failed")]
    EncryptFailed,

    #[error(transparent)]
    Storage(#[from] TrustStoreError),
}

impl From<CryptoError> for SecureChannelError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::AuthenticationFailed => Self::AuthenticationFailed,
            CryptoError::EncryptFailed => Self::EncryptFailed,
            other => Self::MalformedKey(other.to_string()),
        }
    }
}
