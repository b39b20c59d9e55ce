use crate::db::models::{NewSyncRuntimeInfoRow, SyncRuntimeInfoRow};
use crate::db::ports::{InsertMapper, RowMapper};
use anyhow::{anyhow, Context, Result};
use uc_core::sync::{HostInfo, SyncRuntimeInfo, SyncState};
use uc_core::AppInstanceId;

pub struct SyncRuntimeInfoRowMapper;

impl InsertMapper<SyncRuntimeInfo, NewSyncRuntimeInfoRow> for SyncRuntimeInfoRowMapper {
    fn to_row(&self, domain: &SyncRuntimeInfo) -> Result<NewSyncRuntimeInfoRow> {
        Ok(NewSyncRuntimeInfoRow {
            app_instance_id: domain.app_instance_id.as_str().to_string(),
            app_version: domain.app_version.clone(),
            user_name: domain.user_name.clone(),
            device_id: domain.device_id.clone(),
            device_name: domain.device_name.clone(),
            platform_name: domain.platform_name.clone(),
            platform_version: domain.platform_version.clone(),
            platform_arch: domain.platform_arch.clone(),
            platform_bit_mode: i32::from(domain.platform_bit_mode),
            host_list: serde_json::to_string(&domain.host_list).context("encode host_list")?,
            port: i32::from(domain.port),
            note_name: domain.note_name.clone(),
            connect_host_address: domain.connect_host_address.clone(),
            connect_state: domain.connect_state.as_str().to_string(),
            allow_send: domain.allow_send,
            allow_receive: domain.allow_receive,
            create_time: domain.create_time,
            modify_time: domain.modify_time,
        })
    }
}

impl RowMapper<SyncRuntimeInfoRow, SyncRuntimeInfo> for SyncRuntimeInfoRowMapper {
    fn to_domain(&self, row: &SyncRuntimeInfoRow) -> Result<SyncRuntimeInfo> {
        let host_list: Vec<HostInfo> = serde_json::from_str(&row.host_list)
            .with_context(|| format!("invalid host_list for {}", row.app_instance_id))?;
        let connect_state = row
            .connect_state
            .parse::<SyncState>()
            .map_err(|e| anyhow!(e))?;

        Ok(SyncRuntimeInfo {
            app_instance_id: AppInstanceId::new(row.app_instance_id.as_str()),
            app_version: row.app_version.clone(),
            user_name: row.user_name.clone(),
            device_id: row.device_id.clone(),
            device_name: row.device_name.clone(),
            platform_name: row.platform_name.clone(),
            platform_version: row.platform_version.clone(),
            platform_arch: row.platform_arch.clone(),
            platform_bit_mode: u8::try_from(row.platform_bit_mode)
                .map_err(|_| anyhow!("invalid platform_bit_mode: {}", row.platform_bit_mode))?,
            host_list,
            port: u16::try_from(row.port).map_err(|_| anyhow!("invalid port: {}", row.port))?,
            note_name: row.note_name.clone(),
            connect_host_address: row.connect_host_address.clone(),
            connect_state,
            allow_send: row.allow_send,
            allow_receive: row.allow_receive,
            create_time: row.create_time,
            modify_time: row.modify_time,
        })
    }
}
