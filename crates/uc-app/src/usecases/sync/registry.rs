//! Sync runtime registry
//!
//! Reconciles peer announcements with the persisted per-peer records.
//! Writes to one record are serialized by a per-key lock; readers never
//! block on it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use uc_core::ports::{ClockPort, SyncRuntimeInfoRepositoryError, SyncRuntimeInfoRepositoryPort};
use uc_core::sync::{SyncInfo, SyncRuntimeInfo, SyncState};
use uc_core::AppInstanceId;

pub struct SyncRuntimeRegistry {
    repo: Arc<dyn SyncRuntimeInfoRepositoryPort>,
    clock: Arc<dyn ClockPort>,
    write_locks: Mutex<HashMap<AppInstanceId, Arc<Mutex<()>>>>,
}

impl SyncRuntimeRegistry {
    pub fn new(repo: Arc<dyn SyncRuntimeInfoRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            repo,
            clock,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn write_lock(&self, id: &AppInstanceId) -> Arc<Mutex<()>> {
        self.write_locks
            .lock()
            .await
            .entry(id.clone())
            .or_default()
            .clone()
    }

    /// Creates or reconciles the record for an announcement. Returns whether
    /// anything changed; storage failures are logged and reported as `false`.
    pub async fn insert_or_update(&self, info: &SyncInfo) -> bool {
        let id = info.app_instance_id();
        match self.try_insert_or_update(info).await {
            Ok(changed) => changed,
            Err(err) => {
                warn!(app_instance_id = %id, error = %err, "Sync runtime upsert failed, treating as no change");
                false
            }
        }
    }

    async fn try_insert_or_update(&self, info: &SyncInfo) -> Result<bool, SyncRuntimeInfoRepositoryError> {
        let id = info.app_instance_id();
        let lock = self.write_lock(id).await;
        let _guard = lock.lock().await;
        let now = self.clock.now_ms();

        let Some(mut record) = self.repo.get(id).await? else {
            self.repo
                .insert(&SyncRuntimeInfo::from_sync_info(info, now))
                .await?;
            debug!(app_instance_id = %id, "Registered new peer");
            return Ok(true);
        };

        let previous_modify_time = record.modify_time;
        let changed = record.apply_sync_info(info, now);
        if changed || record.modify_time != previous_modify_time {
            self.repo.update(&record).await?;
        }
        if changed {
            debug!(app_instance_id = %id, "Peer announcement changed stored record");
        }
        Ok(changed)
    }

    pub async fn get(
        &self,
        id: &AppInstanceId,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        self.repo.get(id).await
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        self.repo.list_all().await
    }

    /// Copy-on-write update: `f` edits a copy of the current snapshot, which
    /// replaces the stored record only when it differs. Returns the resulting
    /// snapshot, or `None` if no record exists.
    pub async fn update<F>(
        &self,
        id: &AppInstanceId,
        f: F,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError>
    where
        F: FnOnce(&mut SyncRuntimeInfo) + Send,
    {
        let lock = self.write_lock(id).await;
        let _guard = lock.lock().await;

        let Some(current) = self.repo.get(id).await? else {
            return Ok(None);
        };

        let mut next = current.clone();
        f(&mut next);
        next.app_instance_id = current.app_instance_id.clone();
        next.create_time = current.create_time;

        if next == current {
            return Ok(Some(current));
        }
        next.touch(self.clock.now_ms());
        self.repo.update(&next).await?;
        Ok(Some(next))
    }

    pub async fn update_connect_state(
        &self,
        id: &AppInstanceId,
        state: SyncState,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        self.update(id, |info| info.connect_state = state).await
    }

    pub async fn set_allow_send(
        &self,
        id: &AppInstanceId,
        allow: bool,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        self.update(id, |info| info.allow_send = allow).await
    }

    pub async fn set_allow_receive(
        &self,
        id: &AppInstanceId,
        allow: bool,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        self.update(id, |info| info.allow_receive = allow).await
    }

    pub async fn set_note_name(
        &self,
        id: &AppInstanceId,
        note_name: Option<String>,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        let note_name = note_name.filter(|n| !n.trim().is_empty());
        self.update(id, move |info| info.note_name = note_name).await
    }

    pub async fn set_connect_host_address(
        &self,
        id: &AppInstanceId,
        host_address: Option<String>,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        self.update(id, move |info| info.connect_host_address = host_address)
            .await
    }

    /// Idempotent.
    pub async fn delete(&self, id: &AppInstanceId) -> Result<(), SyncRuntimeInfoRepositoryError> {
        let lock = self.write_lock(id).await;
        {
            let _guard = lock.lock().await;
            self.repo.delete(id).await?;
        }
        drop(lock);

        // A writer still holding or waiting on this lock keeps the entry.
        let mut locks = self.write_locks.lock().await;
        if locks.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(id);
        }
        Ok(())
    }
}
