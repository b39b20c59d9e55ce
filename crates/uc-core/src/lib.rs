//! # uc-core
//!
//! Core domain models for UniClipboard device pairing, trust and sync state.
//!
//! This crate contains pure business logic without any infrastructure
//! dependencies: key material and crypto primitives, the pairing protocol
//! messages and session state, the per-peer sync runtime model, transfer
//! progress and the port traits implemented by `uc-infra`.

pub mod config;
pub mod crypto;
pub mod ids;
pub mod pairing;
pub mod ports;
pub mod sync;

pub use config::AppConfig;
pub use ids::AppInstanceId;
pub use pairing::{PairingError, PairingEvent, PairingState};
pub use sync::{SyncInfo, SyncRuntimeInfo, SyncState};
