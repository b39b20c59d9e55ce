//! Discovery pipeline: blacklist filter → registry upsert → per-peer handler.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

use uc_core::ports::TrustStorePort;
use uc_core::{AppInstanceId, SyncInfo};

use super::handler::{GeneralSyncHandler, MarketingSyncHandler, SyncHandler};
use super::registry::SyncRuntimeRegistry;
use crate::usecases::blacklist::BlacklistService;
use crate::usecases::pairing::PairingEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementOutcome {
    /// Dropped by the blacklist before reaching the registry
    Blocked,
    Updated { changed: bool },
}

pub struct SyncManager {
    local_version: String,
    marketing_mode: bool,
    blacklist: Arc<BlacklistService>,
    registry: Arc<SyncRuntimeRegistry>,
    trust_store: Arc<dyn TrustStorePort>,
    engine: Arc<PairingEngine>,
    handlers: RwLock<HashMap<AppInstanceId, Arc<dyn SyncHandler>>>,
}

impl SyncManager {
    pub fn new(
        local_version: impl Into<String>,
        marketing_mode: bool,
        blacklist: Arc<BlacklistService>,
        registry: Arc<SyncRuntimeRegistry>,
        trust_store: Arc<dyn TrustStorePort>,
        engine: Arc<PairingEngine>,
    ) -> Self {
        Self {
            local_version: local_version.into(),
            marketing_mode,
            blacklist,
            registry,
            trust_store,
            engine,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<SyncRuntimeRegistry> {
        &self.registry
    }

    pub fn blacklist(&self) -> &Arc<BlacklistService> {
        &self.blacklist
    }

    pub async fn on_announcement(&self, info: SyncInfo) -> AnnouncementOutcome {
        let id = info.app_instance_id().clone();
        if self.blacklist.is_blocked(&id).await {
            debug!(app_instance_id = %id, "Dropping announcement from blacklisted device");
            return AnnouncementOutcome::Blocked;
        }

        let changed = self.registry.insert_or_update(&info).await;
        self.ensure_handler(&id).await;
        AnnouncementOutcome::Updated { changed }
    }

    pub async fn handler(&self, id: &AppInstanceId) -> Option<Arc<dyn SyncHandler>> {
        self.handlers.read().await.get(id).cloned()
    }

    async fn ensure_handler(&self, id: &AppInstanceId) {
        if self.handlers.read().await.contains_key(id) {
            return;
        }

        let handler: Arc<dyn SyncHandler> = if self.marketing_mode {
            match self.registry.get(id).await {
                Ok(Some(info)) => Arc::new(MarketingSyncHandler::new(info)),
                _ => return,
            }
        } else {
            Arc::new(GeneralSyncHandler::new(
                id.clone(),
                self.local_version.clone(),
                self.registry.clone(),
                self.trust_store.clone(),
                self.engine.clone(),
            ))
        };

        self.handlers
            .write()
            .await
            .entry(id.clone())
            .or_insert(handler);
    }

    /// Blocks a known device and stops driving it.
    pub async fn block_device(&self, id: &AppInstanceId) -> Result<bool> {
        let info = self
            .registry
            .get(id)
            .await?
            .with_context(|| format!("unknown device {id}"))?;
        let added = self.blacklist.add(info.to_sync_info()).await?;
        self.handlers.write().await.remove(id);
        Ok(added)
    }

    /// Unpairs and forgets a device: trust record, runtime record, handler
    /// and any pairing session.
    pub async fn remove_device(&self, id: &AppInstanceId) -> Result<()> {
        self.trust_store
            .delete(id)
            .await
            .context("Failed to delete trust record")?;
        self.registry
            .delete(id)
            .await
            .context("Failed to delete sync runtime info")?;
        self.handlers.write().await.remove(id);
        self.engine.forget(id).await;
        info!(app_instance_id = %id, "Device removed");
        Ok(())
    }
}
