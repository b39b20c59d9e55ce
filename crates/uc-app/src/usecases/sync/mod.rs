mod handler;
mod manager;
mod process_manager;
mod registry;

pub use handler::{GeneralSyncHandler, MarketingSyncHandler, SyncHandler};
pub use manager::{AnnouncementOutcome, SyncManager};
pub use process_manager::{PasteSyncProcessManager, ProcessHandle};
pub use registry::SyncRuntimeRegistry;
