use crate::db::schema::sync_runtime_info;
use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = sync_runtime_info)]
pub struct SyncRuntimeInfoRow {
    pub app_instance_id: String,
    pub app_version: String,
    pub user_name: String,
    pub device_id: String,
    pub device_name: String,
    pub platform_name: String,
    pub platform_version: String,
    pub platform_arch: String,
    pub platform_bit_mode: i32,
    /// JSON array of `HostInfo`
    pub host_list: String,
    pub port: i32,
    pub note_name: Option<String>,
    pub connect_host_address: Option<String>,
    pub connect_state: String,
    pub allow_send: bool,
    pub allow_receive: bool,
    pub create_time: i64,
    pub modify_time: i64,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = sync_runtime_info)]
#[diesel(primary_key(app_instance_id))]
#[diesel(treat_none_as_null = true)]
pub struct NewSyncRuntimeInfoRow {
    pub app_instance_id: String,
    pub app_version: String,
    pub user_name: String,
    pub device_id: String,
    pub device_name: String,
    pub platform_name: String,
    pub platform_version: String,
    pub platform_arch: String,
    pub platform_bit_mode: i32,
    pub host_list: String,
    pub port: i32,
    pub note_name: Option<String>,
    pub connect_host_address: Option<String>,
    pub connect_state: String,
    pub allow_send: bool,
    pub allow_receive: bool,
    pub create_time: i64,
    pub modify_time: i64,
}
