use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use uc_core::ports::{ClockPort, TrustStoreError, TrustStorePort};
use uc_core::AppInstanceId;

use crate::db::models::NewTrustedPeerKeyRow;
use crate::db::ports::DbExecutor;
use crate::db::schema::trusted_peer_key::dsl::*;

/// SQLite-backed trust store. The primary key on `app_instance_id` plus
/// `ON CONFLICT DO NOTHING` gives first-write-wins without a read.
pub struct DieselTrustKeyRepository<E> {
    executor: E,
    clock: Arc<dyn ClockPort>,
}

impl<E> DieselTrustKeyRepository<E> {
    pub fn new(executor: E, clock: Arc<dyn ClockPort>) -> Self {
        Self { executor, clock }
    }
}

fn storage_err(e: anyhow::Error) -> TrustStoreError {
    TrustStoreError::Storage(e.to_string())
}

#[async_trait]
impl<E: DbExecutor> TrustStorePort for DieselTrustKeyRepository<E> {
    async fn save_key(&self, id: &AppInstanceId, key: &[u8]) -> Result<bool, TrustStoreError> {
        let row = NewTrustedPeerKeyRow {
            app_instance_id: id.as_str().to_string(),
            public_key: key.to_vec(),
            created_at: self.clock.now_ms(),
        };

        let inserted = self
            .executor
            .run(move |conn| {
                Ok(diesel::insert_into(trusted_peer_key)
                    .values(&row)
                    .on_conflict(app_instance_id)
                    .do_nothing()
                    .execute(conn)?)
            })
            .map_err(storage_err)?;

        Ok(inserted == 1)
    }

    async fn exists(&self, id: &AppInstanceId) -> Result<bool, TrustStoreError> {
        Ok(self.get_key(id).await?.is_some())
    }

    async fn get_key(&self, id: &AppInstanceId) -> Result<Option<Vec<u8>>, TrustStoreError> {
        let id_str = id.as_str().to_string();
        self.executor
            .run(move |conn| {
                Ok(trusted_peer_key
                    .filter(app_instance_id.eq(&id_str))
                    .select(public_key)
                    .first::<Vec<u8>>(conn)
                    .optional()?)
            })
            .map_err(storage_err)
    }

    async fn delete(&self, id: &AppInstanceId) -> Result<(), TrustStoreError> {
        let id_str = id.as_str().to_string();
        self.executor
            .run(move |conn| {
                diesel::delete(trusted_peer_key.filter(app_instance_id.eq(&id_str)))
                    .execute(conn)?;
                Ok(())
            })
            .map_err(storage_err)
    }

    async fn list_ids(&self) -> Result<Vec<AppInstanceId>, TrustStoreError> {
        self.executor
            .run(|conn| {
                let ids = trusted_peer_key
                    .select(app_instance_id)
                    .order(created_at.asc())
                    .load::<String>(conn)?;
                Ok(ids.into_iter().map(AppInstanceId::new).collect())
            })
            .map_err(storage_err)
    }
}
