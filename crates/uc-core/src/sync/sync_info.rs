//! Peer announcement as pushed by the discovery layer.

use serde::{Deserialize, Serialize};

use crate::ids::AppInstanceId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncInfo {
    pub app_info: AppInfo,
    pub endpoint_info: EndpointInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub app_instance_id: AppInstanceId,
    pub app_version: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub device_id: String,
    pub device_name: String,
    pub platform: Platform,
    pub host_list: Vec<HostInfo>,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub version: String,
    pub arch: String,
    pub bit_mode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostInfo {
    pub network_prefix_length: u8,
    pub host_address: String,
}

impl SyncInfo {
    pub fn app_instance_id(&self) -> &AppInstanceId {
        &self.app_info.app_instance_id
    }
}
