use crate::db::schema::trusted_peer_key;
use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = trusted_peer_key)]
pub struct TrustedPeerKeyRow {
    pub app_instance_id: String,
    pub public_key: Vec<u8>,
    pub created_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = trusted_peer_key)]
pub struct NewTrustedPeerKeyRow {
    pub app_instance_id: String,
    pub public_key: Vec<u8>,
    pub created_at: i64,
}
