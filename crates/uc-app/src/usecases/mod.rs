//! Business logic use cases
//!
//! ```text
//! discovery ──► SyncManager ──► BlacklistService (drop blocked)
//!                   │
//!                   ├──► SyncRuntimeRegistry (upsert record)
//!                   └──► SyncHandler ──► PairingEngine ──► trust store
//!                                                              │
//!                        SecureChannel ◄───────────────────────┘
//! ```

pub mod blacklist;
pub mod identity;
pub mod pairing;
pub mod secure_channel;
pub mod sync;
