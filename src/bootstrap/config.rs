//! # Configuration Loader / 配置加载器
//!
//! `load_config` only reads and parses; `load_or_init_config` additionally
//! fills first-run facts (instance id, device name, data paths) and writes
//! them back so the next run sees the same identity.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;
use uc_core::config::AppConfig;
use uc_core::AppInstanceId;

const APP_DIR_NAME: &str = "uniclipboard";

/// Platform data directory, e.g. `~/.local/share/uniclipboard`.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_local_dir().context("No local data directory on this platform")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML for
/// `AppConfig`.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Loads the config at `config_path`, or starts from defaults when the file
/// does not exist. Missing identity facts are filled in and persisted.
pub fn load_or_init_config(config_path: &Path, data_dir: PathBuf) -> anyhow::Result<AppConfig> {
    let mut config = if config_path.exists() {
        load_config(config_path)?
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        AppConfig::default()
    };

    let mut dirty = !config_path.exists();
    if config.app_instance_id.is_none() {
        config.app_instance_id = Some(AppInstanceId::generate());
        dirty = true;
    }
    if config.device_name.is_empty() {
        config.device_name = gethostname::gethostname()
            .to_str()
            .unwrap_or("Unknown Device")
            .to_string();
        dirty = true;
    }
    if config.app_version.is_empty() {
        config.app_version = env!("CARGO_PKG_VERSION").to_string();
    }

    if dirty {
        save_config(config_path, &config)?;
    }
    Ok(config.with_data_dir(data_dir))
}

fn save_config(config_path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to encode config as TOML")?;
    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))
}
