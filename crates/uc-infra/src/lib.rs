//! # uc-infra
//!
//! Adapters for the `uc-core` ports: SQLite repositories (Diesel), the
//! file-backed config and key pair stores, an in-memory trust store, a placeholder
//! pairing transport and the system clock.

pub mod config_store;
pub mod db;
pub mod discovery;
pub mod network;
pub mod security;
pub mod time;

pub use config_store::FileConfigStore;
pub use discovery::NoopDiscoveryRefresh;
pub use network::PlaceholderPairingTransport;
pub use security::{FileKeyPairStore, InMemoryTrustStore};
pub use time::SystemClock;
