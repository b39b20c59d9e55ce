//! Sync runtime domain: peer announcements, per-peer runtime records,
//! connection state, version relation and transfer progress.

mod progress;
mod runtime_info;
mod state;
mod sync_info;
mod version;

pub use progress::PasteSingleProcess;
pub use runtime_info::SyncRuntimeInfo;
pub use state::SyncState;
pub use sync_info::{AppInfo, EndpointInfo, HostInfo, Platform, SyncInfo};
pub use version::VersionRelation;

#[cfg(test)]
pub(crate) use runtime_info::fixtures;
