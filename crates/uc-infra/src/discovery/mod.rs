use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;
use uc_core::ports::DiscoveryRefreshPort;

/// Stand-in for instances that run without a discovery service; the
/// refresh request is only logged.
#[derive(Debug, Default)]
pub struct NoopDiscoveryRefresh;

#[async_trait]
impl DiscoveryRefreshPort for NoopDiscoveryRefresh {
    async fn refresh(&self) -> Result<()> {
        debug!("discovery refresh requested, no discovery service attached");
        Ok(())
    }
}
