use async_trait::async_trait;

/// Flat string key/value configuration store.
#[async_trait]
pub trait ConfigStorePort: Send + Sync {
    async fn get_config(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Overwrites the value under `key` and persists it before returning.
    async fn set_config(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
