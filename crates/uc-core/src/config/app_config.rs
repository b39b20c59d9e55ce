//! Application configuration DTO.
//!
//! Mirrors `config.toml`:
//!
//! ```toml
//! app_instance_id = "4d7c..."
//! device_name = "Studio"
//! port = 13129
//! marketing_mode = false
//!
//! [pairing]
//! response_timeout_secs = 30
//! confirm_timeout_secs = 300
//! max_clock_skew_secs = 300
//! token_digits = 6
//! auto_trust = false
//!
//! [sync]
//! max_concurrent_tasks = 10
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ids::AppInstanceId;

pub const DEFAULT_PORT: u16 = 13129;
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 10;

/// Application configuration DTO（纯数据）
///
/// Paths may be empty here; the bootstrap layer resolves them against the
/// platform data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Stable identifier of this install. `None` until first run assigns one.
    pub app_instance_id: Option<AppInstanceId>,
    pub app_version: String,
    pub device_name: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub config_store_path: PathBuf,
    /// Secret half of the local key pair
    pub key_pair_path: PathBuf,
    pub log_dir: PathBuf,
    /// Use the demo sync handler instead of the real one
    pub marketing_mode: bool,
    pub pairing: PairingConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// How long the initiator waits for a `PairingResponse`
    pub response_timeout_secs: u64,
    /// How long a pending session waits for the user to compare tokens
    pub confirm_timeout_secs: u64,
    pub max_clock_skew_secs: u64,
    pub token_digits: u32,
    /// Skip token comparison (trusted network)
    pub auto_trust: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Global permits shared by every running paste/transfer subtask
    pub max_concurrent_tasks: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_instance_id: None,
            app_version: String::new(),
            device_name: String::new(),
            port: DEFAULT_PORT,
            database_path: PathBuf::new(),
            config_store_path: PathBuf::new(),
            key_pair_path: PathBuf::new(),
            log_dir: PathBuf::new(),
            marketing_mode: false,
            pairing: PairingConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            response_timeout_secs: 30,
            confirm_timeout_secs: 300,
            max_clock_skew_secs: 300,
            token_digits: crate::crypto::DEFAULT_TOKEN_DIGITS,
            auto_trust: false,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
        }
    }
}

impl AppConfig {
    /// Create AppConfig from a parsed TOML document. Missing keys keep their
    /// defaults; no path or range validation happens here.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(toml_value.clone().try_into::<Self>()?)
    }

    /// Fill empty paths from a platform data directory.
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        if self.database_path.as_os_str().is_empty() {
            self.database_path = data_dir.join("uniclipboard.db");
        }
        if self.config_store_path.as_os_str().is_empty() {
            self.config_store_path = data_dir.join("config_store.json");
        }
        if self.key_pair_path.as_os_str().is_empty() {
            self.key_pair_path = data_dir.join("identity").join("key_pair.bin");
        }
        if self.log_dir.as_os_str().is_empty() {
            self.log_dir = data_dir.join("logs");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn test_from_toml_empty_document_uses_defaults() {
        let toml_value: Value = toml::from_str("").unwrap();
        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 13129);
        assert_eq!(config.pairing.token_digits, 6);
        assert_eq!(config.sync.max_concurrent_tasks, 10);
        assert!(config.app_instance_id.is_none());
    }

    #[test]
    fn test_from_toml_partial_sections() {
        let toml_str = r#"
            app_instance_id = "instance-1"
            device_name = "Studio"
            marketing_mode = true

            [pairing]
            auto_trust = true
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();
        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.app_instance_id, Some(AppInstanceId::new("instance-1")));
        assert_eq!(config.device_name, "Studio");
        assert!(config.marketing_mode);
        assert!(config.pairing.auto_trust);
        assert_eq!(config.pairing.confirm_timeout_secs, 300);
    }

    #[test]
    fn test_from_toml_wrong_type_is_error() {
        let toml_value: Value = toml::from_str("port = \"not-a-port\"").unwrap();
        assert!(AppConfig::from_toml(&toml_value).is_err());
    }

    #[test]
    fn test_with_data_dir_only_fills_empty_paths() {
        let config = AppConfig {
            database_path: PathBuf::from("/custom/db.sqlite"),
            ..AppConfig::default()
        }
        .with_data_dir(PathBuf::from("/tmp/test"));

        assert_eq!(config.database_path, PathBuf::from("/custom/db.sqlite"));
        assert_eq!(config.config_store_path, PathBuf::from("/tmp/test/config_store.json"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/test/logs"));
        assert_eq!(
            config.key_pair_path,
            PathBuf::from("/tmp/test/identity/key_pair.bin")
        );
    }
}
