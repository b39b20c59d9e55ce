//! # Pure Data Module / 纯数据模块
//!
//! Configuration DTOs and the TOML → DTO mapping. Resolution of paths and
//! generation of missing identifiers belong to the bootstrap layer.

pub mod app_config;

pub use app_config::{AppConfig, PairingConfig, SyncConfig};
