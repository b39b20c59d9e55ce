use async_trait::async_trait;

use super::errors::TrustStoreError;
use crate::ids::AppInstanceId;

/// Verified peer key-exchange public keys, keyed by instance identifier.
///
/// Absence of a key means the peer is untrusted.
#[async_trait]
pub trait TrustStorePort: Send + Sync {
    /// First write wins: returns `false` without touching the stored key
    /// when one already exists.
    async fn save_key(
        &self,
        app_instance_id: &AppInstanceId,
        public_key: &[u8],
    ) -> Result<bool, TrustStoreError>;

    async fn exists(&self, app_instance_id: &AppInstanceId) -> Result<bool, TrustStoreError>;

    async fn get_key(
        &self,
        app_instance_id: &AppInstanceId,
    ) -> Result<Option<Vec<u8>>, TrustStoreError>;

    /// Idempotent.
    async fn delete(&self, app_instance_id: &AppInstanceId) -> Result<(), TrustStoreError>;

    async fn list_ids(&self) -> Result<Vec<AppInstanceId>, TrustStoreError>;
}
