use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use uc_core::crypto::PairingToken;
use uc_core::ports::TrustStorePort;
use uc_core::sync::{SyncRuntimeInfo, SyncState, VersionRelation};
use uc_core::{AppInstanceId, PairingError};

use super::registry::SyncRuntimeRegistry;
use crate::usecases::pairing::PairingEngine;

/// Per-peer sync driver.
///
/// 一个对端设备对应一个 handler，在构造时选定具体实现。
#[async_trait]
pub trait SyncHandler: Send + Sync {
    fn app_instance_id(&self) -> &AppInstanceId;

    /// Current snapshot of the peer's runtime record.
    async fn sync_runtime_info(&self) -> Option<SyncRuntimeInfo>;

    /// How the peer's app version relates to ours. `None` when the peer is
    /// unknown or either version does not parse.
    async fn version_relation(&self) -> Option<VersionRelation>;

    async fn is_trusted(&self) -> bool;

    async fn update_connect_state(&self, state: SyncState) -> anyhow::Result<()>;

    /// Starts a pairing handshake. `None` when there is nothing to pair.
    async fn try_pair(&self) -> Result<Option<PairingToken>, PairingError>;
}

/// Handler backed by the registry, the trust store and the pairing engine.
pub struct GeneralSyncHandler {
    app_instance_id: AppInstanceId,
    local_version: String,
    registry: Arc<SyncRuntimeRegistry>,
    trust_store: Arc<dyn TrustStorePort>,
    engine: Arc<PairingEngine>,
}

impl GeneralSyncHandler {
    pub fn new(
        app_instance_id: AppInstanceId,
        local_version: impl Into<String>,
        registry: Arc<SyncRuntimeRegistry>,
        trust_store: Arc<dyn TrustStorePort>,
        engine: Arc<PairingEngine>,
    ) -> Self {
        Self {
            app_instance_id,
            local_version: local_version.into(),
            registry,
            trust_store,
            engine,
        }
    }
}

#[async_trait]
impl SyncHandler for GeneralSyncHandler {
    fn app_instance_id(&self) -> &AppInstanceId {
        &self.app_instance_id
    }

    async fn sync_runtime_info(&self) -> Option<SyncRuntimeInfo> {
        match self.registry.get(&self.app_instance_id).await {
            Ok(info) => info,
            Err(err) => {
                warn!(app_instance_id = %self.app_instance_id, error = %err, "Failed to read sync runtime info");
                None
            }
        }
    }

    async fn version_relation(&self) -> Option<VersionRelation> {
        let info = self.sync_runtime_info().await?;
        let relation = VersionRelation::between(&self.local_version, &info.app_version);
        if relation.is_none() {
            warn!(
                app_instance_id = %self.app_instance_id,
                local_version = %self.local_version,
                peer_version = %info.app_version,
                "Unparseable app version, relation unknown"
            );
        }
        relation
    }

    async fn is_trusted(&self) -> bool {
        match self.trust_store.exists(&self.app_instance_id).await {
            Ok(trusted) => trusted,
            Err(err) => {
                warn!(app_instance_id = %self.app_instance_id, error = %err, "Trust lookup failed, treating peer as untrusted");
                false
            }
        }
    }

    async fn update_connect_state(&self, state: SyncState) -> anyhow::Result<()> {
        let updated = self
            .registry
            .update_connect_state(&self.app_instance_id, state)
            .await?;
        if updated.is_none() {
            anyhow::bail!("no sync runtime info for {}", self.app_instance_id);
        }
        debug!(app_instance_id = %self.app_instance_id, state = %state, "Connect state updated");
        Ok(())
    }

    async fn try_pair(&self) -> Result<Option<PairingToken>, PairingError> {
        self.engine.initiate(&self.app_instance_id).await.map(Some)
    }
}

/// Demo handler used in marketing mode: reports a connected, trusted peer
/// on the same version and never touches storage or the network.
pub struct MarketingSyncHandler {
    info: SyncRuntimeInfo,
}

impl MarketingSyncHandler {
    pub fn new(mut info: SyncRuntimeInfo) -> Self {
        info.connect_state = SyncState::Connected;
        Self { info }
    }
}

#[async_trait]
impl SyncHandler for MarketingSyncHandler {
    fn app_instance_id(&self) -> &AppInstanceId {
        &self.info.app_instance_id
    }

    async fn sync_runtime_info(&self) -> Option<SyncRuntimeInfo> {
        Some(self.info.clone())
    }

    async fn version_relation(&self) -> Option<VersionRelation> {
        Some(VersionRelation::EqualTo)
    }

    async fn is_trusted(&self) -> bool {
        true
    }

    async fn update_connect_state(&self, _state: SyncState) -> anyhow::Result<()> {
        Ok(())
    }

    async fn try_pair(&self) -> Result<Option<PairingToken>, PairingError> {
        Ok(None)
    }
}
