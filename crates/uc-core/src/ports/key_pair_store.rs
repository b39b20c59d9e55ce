use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyPairStoreError {
    #[error("key pair store failed: {0}")]
    Store(String),

    #[error("key pair data corrupt: {0}")]
    Corrupt(String),
}

/// Storage for the local key pair's secret bytes. Encryption at rest is the
/// implementation's concern.
pub trait SecureKeyPairStorePort: Send + Sync {
    fn load_secret(&self) -> Result<Option<Vec<u8>>, KeyPairStoreError>;

    /// Must be idempotent (overwrite if exists).
    fn store_secret(&self, secret: &[u8]) -> Result<(), KeyPairStoreError>;
}

