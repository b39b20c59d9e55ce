use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uc_core::ports::{TrustStoreError, TrustStorePort};
use uc_core::AppInstanceId;

/// Process-local trust store, used by tests and ephemeral instances.
#[derive(Default)]
pub struct InMemoryTrustStore {
    keys: RwLock<HashMap<AppInstanceId, Vec<u8>>>,
}

impl InMemoryTrustStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrustStorePort for InMemoryTrustStore {
    async fn save_key(&self, id: &AppInstanceId, key: &[u8]) -> Result<bool, TrustStoreError> {
        match self.keys.write().await.entry(id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(key.to_vec());
                Ok(true)
            }
        }
    }

    async fn exists(&self, id: &AppInstanceId) -> Result<bool, TrustStoreError> {
        Ok(self.keys.read().await.contains_key(id))
    }

    async fn get_key(&self, id: &AppInstanceId) -> Result<Option<Vec<u8>>, TrustStoreError> {
        Ok(self.keys.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &AppInstanceId) -> Result<(), TrustStoreError> {
        self.keys.write().await.remove(id);
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<AppInstanceId>, TrustStoreError> {
        Ok(self.keys.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_key_first_write_wins() {
        let store = InMemoryTrustStore::new();
        let peer = AppInstanceId::new("peerA");

        assert!(store.save_key(&peer, b"key-bytes").await.unwrap());
        assert!(!store.save_key(&peer, b"other-key").await.unwrap());
        assert_eq!(store.get_key(&peer).await.unwrap().as_deref(), Some(&b"key-bytes"[..]));

        store.delete(&peer).await.unwrap();
        store.delete(&peer).await.unwrap();
        assert!(!store.exists(&peer).await.unwrap());
    }
}
