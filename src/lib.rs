//! UniClipboard device pairing, trust and sync-state management.
//!
//! The library side holds bootstrap (config, tracing, wiring) and the CLI
//! command definitions; `main.rs` only parses arguments and dispatches.

pub mod bootstrap;
pub mod cli;
