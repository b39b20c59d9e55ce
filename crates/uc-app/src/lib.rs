//! UniClipboard Sync Application Layer
//!
//! Use cases over the core ports: identity bootstrap, pairing, secure
//! channel, sync runtime registry, discovery pipeline and bulk transfer
//! progress.

pub mod usecases;

pub use usecases::blacklist::BlacklistService;
pub use usecases::identity::LoadOrGenerateKeyPair;
pub use usecases::pairing::{PairingEngine, PairingEngineConfig};
pub use usecases::secure_channel::{SecureChannel, SecureChannelError};
pub use usecases::sync::{
    AnnouncementOutcome, PasteSyncProcessManager, SyncHandler, SyncManager, SyncRuntimeRegistry,
};
