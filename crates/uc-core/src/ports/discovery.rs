use anyhow::Result;
use async_trait::async_trait;

/// Hook into the discovery layer so it recomputes its visible peer set,
/// e.g. after the blacklist changed.
#[async_trait]
pub trait DiscoveryRefreshPort: Send + Sync {
    async fn refresh(&self) -> Result<()>;
}
