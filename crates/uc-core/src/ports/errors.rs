use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrustStoreError {
    #[error("trust store error: {0}")]
    Storage(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncRuntimeInfoRepositoryError {
    #[error("sync runtime info not found")]
    NotFound,

    /// Concurrent writers raced on the same record.
    #[error("storage conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}
