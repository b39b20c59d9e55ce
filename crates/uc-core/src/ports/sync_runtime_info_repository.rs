use async_trait::async_trait;

use super::errors::SyncRuntimeInfoRepositoryError;
use crate::ids::AppInstanceId;
use crate::sync::SyncRuntimeInfo;

/// Record store for per-peer runtime info. Each call is atomic for the
/// single record it touches.
#[async_trait]
pub trait SyncRuntimeInfoRepositoryPort: Send + Sync {
    async fn get(
        &self,
        app_instance_id: &AppInstanceId,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError>;

    /// All records, newest `create_time` first.
    async fn list_all(&self) -> Result<Vec<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError>;

    /// Fails with `Conflict` when a record with the same id exists.
    async fn insert(&self, info: &SyncRuntimeInfo) -> Result<(), SyncRuntimeInfoRepositoryError>;

    /// Replaces an existing record; `NotFound` when absent.
    async fn update(&self, info: &SyncRuntimeInfo) -> Result<(), SyncRuntimeInfoRepositoryError>;

    /// Idempotent.
    async fn delete(
        &self,
        app_instance_id: &AppInstanceId,
    ) -> Result<(), SyncRuntimeInfoRepositoryError>;
}
