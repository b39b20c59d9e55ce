//! Device blacklist
//!
//! Stored as a JSON list of announcement snapshots under one config key so
//! the UI can still show names of blocked devices.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{info, warn};

use uc_core::ports::{ConfigStorePort, DiscoveryRefreshPort};
use uc_core::{AppInstanceId, SyncInfo};

pub const BLACKLIST_KEY: &str = "blacklist";

pub struct BlacklistService {
    config_store: Arc<dyn ConfigStorePort>,
    discovery: Arc<dyn DiscoveryRefreshPort>,
    /// Serializes read-modify-write of the stored list
    write_lock: Mutex<()>,
}

impl BlacklistService {
    pub fn new(
        config_store: Arc<dyn ConfigStorePort>,
        discovery: Arc<dyn DiscoveryRefreshPort>,
    ) -> Self {
        Self {
            config_store,
            discovery,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> Result<Vec<SyncInfo>> {
        let Some(raw) = self.config_store.get_config(BLACKLIST_KEY).await? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).context("Failed to decode stored blacklist")
    }

    /// An unreadable blacklist blocks nothing.
    pub async fn is_blocked(&self, id: &AppInstanceId) -> bool {
        match self.list().await {
            Ok(entries) => entries.iter().any(|entry| entry.app_instance_id() == id),
            Err(err) => {
                warn!(app_instance_id = %id, error = %err, "Blacklist unreadable, letting announcement through");
                false
            }
        }
    }

    /// Returns `false` when the device was already blocked.
    pub async fn add(&self, info: SyncInfo) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.list().await?;
        if entries
            .iter()
            .any(|entry| entry.app_instance_id() == info.app_instance_id())
        {
            return Ok(false);
        }

        let id = info.app_instance_id().clone();
        entries.push(info);
        self.persist(&entries).await?;
        info!(app_instance_id = %id, "Device added to blacklist");
        self.refresh_discovery().await;
        Ok(true)
    }

    /// Returns `false` when the device was not blocked.
    pub async fn remove(&self, id: &AppInstanceId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.list().await?;
        let before = entries.len();
        entries.retain(|entry| entry.app_instance_id() != id);
        if entries.len() == before {
            return Ok(false);
        }

        self.persist(&entries).await?;
        info!(app_instance_id = %id, "Device removed from blacklist");
        self.refresh_discovery().await;
        Ok(true)
    }

    async fn persist(&self, entries: &[SyncInfo]) -> Result<()> {
        let raw = serde_json::to_string(entries).context("Failed to encode blacklist")?;
        self.config_store.set_config(BLACKLIST_KEY, &raw).await
    }

    async fn refresh_discovery(&self) {
        if let Err(err) = self.discovery.refresh().await {
            warn!(error = %err, "Discovery refresh after blacklist change failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uc_core::sync::{AppInfo, EndpointInfo, Platform};

    #[derive(Default)]
    struct MemoryConfigStore(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl ConfigStorePort for MemoryConfigStore {
        async fn get_config(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.lock().await.get(key).cloned())
        }

        async fn set_config(&self, key: &str, value: &str) -> Result<()> {
            self.0.lock().await.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingRefresh(AtomicUsize);

    #[async_trait]
    impl DiscoveryRefreshPort for CountingRefresh {
        async fn refresh(&self) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    mock! {
        pub Store {}

        #[async_trait]
        impl ConfigStorePort for Store {
            async fn get_config(&self, key: &str) -> Result<Option<String>>;
            async fn set_config(&self, key: &str, value: &str) -> Result<()>;
        }
    }

    fn device(id: &str) -> SyncInfo {
        SyncInfo {
            app_info: AppInfo {
                app_instance_id: AppInstanceId::new(id),
                app_version: "1.0".to_string(),
                user_name: "dave".to_string(),
            },
            endpoint_info: EndpointInfo {
                device_id: format!("dev-{id}"),
                device_name: format!("{id}-laptop"),
                platform: Platform {
                    name: "Windows".to_string(),
                    version: "11".to_string(),
                    arch: "x86_64".to_string(),
                    bit_mode: 64,
                },
                host_list: Vec::new(),
                port: 13129,
            },
        }
    }

    fn service() -> (BlacklistService, Arc<CountingRefresh>) {
        let refresh = Arc::new(CountingRefresh::default());
        let service = BlacklistService::new(Arc::new(MemoryConfigStore::default()), refresh.clone());
        (service, refresh)
    }

    #[tokio::test]
    async fn test_add_is_idempotent_by_instance_id() {
        let (service, refresh) = service();

        assert!(service.add(device("a")).await.unwrap());
        let mut renamed = device("a");
        renamed.endpoint_info.device_name = "renamed".to_string();
        assert!(!service.add(renamed).await.unwrap());

        let entries = service.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].endpoint_info.device_name, "a-laptop");
        assert_eq!(refresh.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_filters_entry() {
        let (service, _) = service();
        service.add(device("a")).await.unwrap();
        service.add(device("b")).await.unwrap();

        assert!(service.remove(&AppInstanceId::new("a")).await.unwrap());
        assert!(!service.remove(&AppInstanceId::new("a")).await.unwrap());

        assert!(!service.is_blocked(&AppInstanceId::new("a")).await);
        assert!(service.is_blocked(&AppInstanceId::new("b")).await);
    }

    #[tokio::test]
    async fn test_unreadable_blacklist_blocks_nothing() {
        let mut store = MockStore::new();
        store
            .expect_get_config()
            .returning(|_| Ok(Some("not json".to_string())));
        let service = BlacklistService::new(Arc::new(store), Arc::new(CountingRefresh::default()));

        assert!(!service.is_blocked(&AppInstanceId::new("a")).await);
        assert!(service.add(device("a")).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_persist_skips_refresh() {
        let mut store = MockStore::new();
        store.expect_get_config().returning(|_| Ok(None));
        store
            .expect_set_config()
            .returning(|_, _| Err(anyhow::anyhow!("read-only filesystem")));
        let refresh = Arc::new(CountingRefresh::default());
        let service = BlacklistService::new(Arc::new(store), refresh.clone());

        assert!(service.add(device("a")).await.is_err());
        assert_eq!(refresh.0.load(Ordering::SeqCst), 0);
    }
}
