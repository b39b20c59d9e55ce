//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations (Hexagonal Architecture). The core
//! never touches disk, sockets or clocks directly.

mod clock;
pub mod config_store;
pub mod discovery;
pub mod errors;
pub mod key_pair_store;
pub mod pairing_transport;
pub mod sync_runtime_info_repository;
pub mod trust_store;

pub use clock::*;
pub use config_store::ConfigStorePort;
pub use discovery::DiscoveryRefreshPort;
pub use errors::{SyncRuntimeInfoRepositoryError, TrustStoreError};
pub use key_pair_store::{KeyPairStoreError, SecureKeyPairStorePort};
pub use pairing_transport::PairingTransportPort;
pub use sync_runtime_info_repository::SyncRuntimeInfoRepositoryPort;
pub use trust_store::TrustStorePort;
