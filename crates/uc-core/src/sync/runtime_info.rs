use serde::{Deserialize, Serialize};

use super::{AppInfo, EndpointInfo, HostInfo, Platform, SyncInfo, SyncState};
use crate::ids::AppInstanceId;

/// Persisted per-peer runtime record, one per instance identifier.
///
/// Values are snapshots: callers read one, derive a modified copy and hand
/// it back to the registry to replace the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRuntimeInfo {
    pub app_instance_id: AppInstanceId,
    pub app_version: String,
    pub user_name: String,
    pub device_id: String,
    pub device_name: String,
    pub platform_name: String,
    pub platform_version: String,
    pub platform_arch: String,
    pub platform_bit_mode: u8,
    pub host_list: Vec<HostInfo>,
    pub port: u16,
    pub note_name: Option<String>,
    pub connect_host_address: Option<String>,
    pub connect_state: SyncState,
    pub allow_send: bool,
    pub allow_receive: bool,
    pub create_time: i64,
    pub modify_time: i64,
}

impl SyncRuntimeInfo {
    /// Record for a peer seen for the first time. Both directions are
    /// allowed and the peer starts out disconnected.
    pub fn from_sync_info(info: &SyncInfo, now_ms: i64) -> Self {
        let endpoint = &info.endpoint_info;
        Self {
            app_instance_id: info.app_info.app_instance_id.clone(),
            app_version: info.app_info.app_version.clone(),
            user_name: info.app_info.user_name.clone(),
            device_id: endpoint.device_id.clone(),
            device_name: endpoint.device_name.clone(),
            platform_name: endpoint.platform.name.clone(),
            platform_version: endpoint.platform.version.clone(),
            platform_arch: endpoint.platform.arch.clone(),
            platform_bit_mode: endpoint.platform.bit_mode,
            host_list: endpoint.host_list.clone(),
            port: endpoint.port,
            note_name: None,
            connect_host_address: None,
            connect_state: SyncState::Disconnected,
            allow_send: true,
            allow_receive: true,
            create_time: now_ms,
            modify_time: now_ms,
        }
    }

    /// Applies the fields of a fresh announcement that differ from this
    /// record and returns whether any did.
    ///
    /// `modify_time` advances when a field changed or when the peer is not
    /// connected, so a stalled peer still gets refreshed downstream.
    pub fn apply_sync_info(&mut self, info: &SyncInfo, now_ms: i64) -> bool {
        let endpoint = &info.endpoint_info;
        let mut changed = false;

        changed |= replace_if_changed(&mut self.app_version, &info.app_info.app_version);
        changed |= replace_if_changed(&mut self.user_name, &info.app_info.user_name);
        changed |= replace_if_changed(&mut self.device_id, &endpoint.device_id);
        changed |= replace_if_changed(&mut self.device_name, &endpoint.device_name);
        changed |= replace_if_changed(&mut self.platform_name, &endpoint.platform.name);
        changed |= replace_if_changed(&mut self.platform_version, &endpoint.platform.version);
        changed |= replace_if_changed(&mut self.platform_arch, &endpoint.platform.arch);
        changed |= replace_if_changed(&mut self.platform_bit_mode, &endpoint.platform.bit_mode);
        changed |= replace_if_changed(&mut self.host_list, &endpoint.host_list);
        changed |= replace_if_changed(&mut self.port, &endpoint.port);

        if changed || !self.connect_state.is_connected() {
            self.touch(now_ms);
        }
        changed
    }

    /// Advances `modify_time`, strictly monotonically.
    pub fn touch(&mut self, now_ms: i64) {
        self.modify_time = now_ms.max(self.modify_time.saturating_add(1));
    }

    /// Announcement view of this record, used for blacklist snapshots.
    pub fn to_sync_info(&self) -> SyncInfo {
        SyncInfo {
            app_info: AppInfo {
                app_instance_id: self.app_instance_id.clone(),
                app_version: self.app_version.clone(),
                user_name: self.user_name.clone(),
            },
            endpoint_info: EndpointInfo {
                device_id: self.device_id.clone(),
                device_name: self.device_name.clone(),
                platform: Platform {
                    name: self.platform_name.clone(),
                    version: self.platform_version.clone(),
                    arch: self.platform_arch.clone(),
                    bit_mode: self.platform_bit_mode,
                },
                host_list: self.host_list.clone(),
                port: self.port,
            },
        }
    }

    /// User note if set, otherwise the announced device name.
    pub fn display_name(&self) -> &str {
        self.note_name.as_deref().unwrap_or(&self.device_name)
    }
}

fn replace_if_changed<T: PartialEq + Clone>(slot: &mut T, incoming: &T) -> bool {
    if slot != incoming {
        *slot = incoming.clone();
        true
    } else {
        false
    }
}
