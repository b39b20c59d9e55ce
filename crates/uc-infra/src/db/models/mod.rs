pub mod sync_runtime_info_row;
pub mod trusted_peer_key_row;

pub use sync_runtime_info_row::{NewSyncRuntimeInfoRow, SyncRuntimeInfoRow};
pub use trusted_peer_key_row::{NewTrustedPeerKeyRow, TrustedPeerKeyRow};
