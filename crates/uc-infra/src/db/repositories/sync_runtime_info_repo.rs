use async_trait::async_trait;
use diesel::prelude::*;

use uc_core::ports::{SyncRuntimeInfoRepositoryError, SyncRuntimeInfoRepositoryPort};
use uc_core::sync::SyncRuntimeInfo;
use uc_core::AppInstanceId;

use crate::db::models::{NewSyncRuntimeInfoRow, SyncRuntimeInfoRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::sync_runtime_info::dsl::*;

pub struct DieselSyncRuntimeInfoRepository<E, M> {
    executor: E,
    mapper: M,
}

impl<E, M> DieselSyncRuntimeInfoRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        Self { executor, mapper }
    }
}

#[async_trait]
impl<E, M> SyncRuntimeInfoRepositoryPort for DieselSyncRuntimeInfoRepository<E, M>
where
    E: DbExecutor,
    M: InsertMapper<SyncRuntimeInfo, NewSyncRuntimeInfoRow>
        + RowMapper<SyncRuntimeInfoRow, SyncRuntimeInfo>
        + Send
        + Sync,
{
    async fn get(
        &self,
        id: &AppInstanceId,
    ) -> Result<Option<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        let id_str = id.as_str().to_string();
        self.executor
            .run(move |conn| {
                let row = sync_runtime_info
                    .filter(app_instance_id.eq(&id_str))
                    .first::<SyncRuntimeInfoRow>(conn)
                    .optional()?;

                row.map(|r| self.mapper.to_domain(&r)).transpose()
            })
            .map_err(|e| SyncRuntimeInfoRepositoryError::Storage(e.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<SyncRuntimeInfo>, SyncRuntimeInfoRepositoryError> {
        self.executor
            .run(|conn| {
                let rows = sync_runtime_info
                    .order(create_time.desc())
                    .load::<SyncRuntimeInfoRow>(conn)?;

                let mut infos = Vec::with_capacity(rows.len());
                for row in rows {
                    let info = self.mapper.to_domain(&row).map_err(|e| {
                        anyhow::anyhow!(
                            "Failed to map sync_runtime_info {}: {}",
                            row.app_instance_id,
                            e
                        )
                    })?;
                    infos.push(info);
                }

                Ok(infos)
            })
            .map_err(|e| SyncRuntimeInfoRepositoryError::Storage(e.to_string()))
    }

    async fn insert(&self, info: &SyncRuntimeInfo) -> Result<(), SyncRuntimeInfoRepositoryError> {
        let row = self
            .mapper
            .to_row(info)
            .map_err(|e| SyncRuntimeInfoRepositoryError::Storage(e.to_string()))?;

        let inserted = self
            .executor
            .run(move |conn| {
                Ok(diesel::insert_into(sync_runtime_info)
                    .values(&row)
                    .on_conflict(app_instance_id)
                    .do_nothing()
                    .execute(conn)?)
            })
            .map_err(|e| SyncRuntimeInfoRepositoryError::Storage(e.to_string()))?;

        if inserted == 0 {
            return Err(SyncRuntimeInfoRepositoryError::Conflict(format!(
                "sync_runtime_info {} already exists",
                info.app_instance_id
            )));
        }

        Ok(())
    }

    async fn update(&self, info: &SyncRuntimeInfo) -> Result<(), SyncRuntimeInfoRepositoryError> {
        let row = self
            .mapper
            .to_row(info)
            .map_err(|e| SyncRuntimeInfoRepositoryError::Storage(e.to_string()))?;

        let affected = self
            .executor
            .run(move |conn| {
                Ok(
                    diesel::update(sync_runtime_info.filter(app_instance_id.eq(&row.app_instance_id)))
                        .set(&row)
                        .execute(conn)?,
                )
            })
            .map_err(|e| SyncRuntimeInfoRepositoryError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(SyncRuntimeInfoRepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &AppInstanceId) -> Result<(), SyncRuntimeInfoRepositoryError> {
        let id_str = id.as_str().to_string();
        self.executor
            .run(move |conn| {
                diesel::delete(sync_runtime_info.filter(app_instance_id.eq(&id_str)))
                    .execute(conn)?;
                Ok(())
            })
            .map_err(|e| SyncRuntimeInfoRepositoryError::Storage(e.to_string()))
    }
}
