use thiserror::Error;

use crate::crypto::CryptoError;

/// Failures that abort a pairing handshake.
///
/// None of these are retried by the engine; the caller re-initiates with a
/// fresh timestamp.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairingError {
    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("stale pairing message: timestamp {timestamp} is {skew_ms}ms away from local clock")]
    StalePairing { timestamp: i64, skew_ms: i64 },

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("pairing timed out: {0}")]
    PairingTimeout(String),

    #[error("pairing with {0} was rejected")]
    TrustRejected(String),

    #[error("no pending pairing session for {0}")]
    SessionNotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CryptoError> for PairingError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::MalformedKey { .. } => Self::MalformedKey(err.to_string()),
            other => Self::ProtocolViolation(other.to_string()),
        }
    }
}
