//! Command line surface: device, blacklist and trust administration.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use uc_core::crypto::IdentityFingerprint;
use uc_core::{AppInstanceId, SyncState};

use crate::bootstrap::{self, AppServices};

pub const EXAMPLES: &str = r"
  # List known devices
  $ uniclipboard-sync devices ls

  # Stop receiving from a device
  $ uniclipboard-sync devices allow <ID> --receive false

  # Block a device from discovery
  $ uniclipboard-sync blacklist add <ID>
";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct RootCommand {
    #[command(flatten)]
    pub args: RootArgs,

    #[command(subcommand)]
    pub action: SubCommands,
}

#[derive(Debug, Parser)]
pub struct RootArgs {
    /// Directory for config and data
    #[arg(long, value_name = "PATH", env = "UNICLIPBOARD_HOME", hide_env_values = true)]
    pub home: Option<PathBuf>,

    /// Config file, `<home>/config.toml` by default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SubCommands {
    #[command(subcommand)]
    Devices(DevicesCommand),
    #[command(subcommand)]
    Blacklist(BlacklistCommand),
    #[command(subcommand)]
    Trust(TrustCommand),
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List known devices, newest first
    #[command(alias = "ls")]
    List,
    /// Unpair and forget a device
    #[command(alias = "rm")]
    Remove { id: String },
    /// Change send/receive permissions
    Allow {
        id: String,
        #[arg(long)]
        send: Option<bool>,
        #[arg(long)]
        receive: Option<bool>,
    },
    /// Set or clear (no name) the note name of a device
    Note { id: String, name: Option<String> },
}

#[derive(Debug, Subcommand)]
pub enum BlacklistCommand {
    #[command(alias = "ls")]
    List,
    /// Block a known device
    Add { id: String },
    #[command(alias = "rm")]
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
pub enum TrustCommand {
    /// Trust state of one device, or every trusted device
    Status { id: Option<String> },
    /// Drop the trust record; the device has to pair again
    Revoke { id: String },
}

impl RootCommand {
    pub async fn run(self) -> Result<()> {
        let home = match self.args.home {
            Some(home) => home,
            None => bootstrap::default_data_dir()?,
        };
        let config_path = self
            .args
            .config
            .unwrap_or_else(|| home.join("config.toml"));

        let config = bootstrap::load_or_init_config(&config_path, home)?;
        if let Err(err) = bootstrap::tracing::init_tracing_subscriber(Some(&config.log_dir)) {
            eprintln!("Failed to initialize tracing: {err}");
        }

        let services = bootstrap::wire_services(config)?;
        let mut stdout = std::io::stdout().lock();
        execute(self.action, &services, &mut stdout).await
    }
}

/// Runs one command against wired services, writing its report to `out`.
pub async fn execute(action: SubCommands, services: &AppServices, out: &mut impl Write) -> Result<()> {
    match action {
        SubCommands::Devices(command) => devices(command, services, out).await,
        SubCommands::Blacklist(command) => blacklist(command, services, out).await,
        SubCommands::Trust(command) => trust(command, services, out).await,
    }
}

async fn devices(command: DevicesCommand, services: &AppServices, out: &mut impl Write) -> Result<()> {
    match command {
        DevicesCommand::List => {
            let devices = services.registry.list().await?;
            if devices.is_empty() {
                writeln!(out, "No known devices")?;
                return Ok(());
            }
            writeln!(
                out,
                "{:<38} {:<24} {:<10} {:<14} {:<5} {:<5} TRUSTED",
                "ID", "NAME", "VERSION", "STATE", "SEND", "RECV"
            )?;
            for device in devices {
                let trusted = services.trust_store.exists(&device.app_instance_id).await?;
                writeln!(
                    out,
                    "{:<38} {:<24} {:<10} {:<14} {:<5} {:<5} {}",
                    device.app_instance_id.as_str(),
                    device.display_name(),
                    device.app_version,
                    device.connect_state.as_str(),
                    device.allow_send,
                    device.allow_receive,
                    trusted
                )?;
            }
        }
        DevicesCommand::Remove { id } => {
            let id = AppInstanceId::new(id);
            services.sync_manager.remove_device(&id).await?;
            writeln!(out, "Removed {id}")?;
        }
        DevicesCommand::Allow { id, send, receive } => {
            if send.is_none() && receive.is_none() {
                bail!("nothing to change, pass --send and/or --receive");
            }
            let id = AppInstanceId::new(id);
            let mut updated = None;
            if let Some(allow) = send {
                updated = services.registry.set_allow_send(&id, allow).await?;
            }
            if let Some(allow) = receive {
                updated = services.registry.set_allow_receive(&id, allow).await?;
            }
            let device = updated.with_context(|| format!("unknown device {id}"))?;
            writeln!(
                out,
                "{id}: send={} receive={}",
                device.allow_send, device.allow_receive
            )?;
        }
        DevicesCommand::Note { id, name } => {
            let id = AppInstanceId::new(id);
            let device = services
                .registry
                .set_note_name(&id, name)
                .await?
                .with_context(|| format!("unknown device {id}"))?;
            writeln!(out, "{id}: {}", device.display_name())?;
        }
    }
    Ok(())
}

async fn blacklist(command: BlacklistCommand, services: &AppServices, out: &mut impl Write) -> Result<()> {
    match command {
        BlacklistCommand::List => {
            let entries = services.blacklist.list().await?;
            if entries.is_empty() {
                writeln!(out, "Blacklist is empty")?;
            }
            for entry in entries {
                writeln!(
                    out,
                    "{:<38} {}",
                    entry.app_instance_id().as_str(),
                    entry.endpoint_info.device_name
                )?;
            }
        }
        BlacklistCommand::Add { id } => {
            let id = AppInstanceId::new(id);
            if services.sync_manager.block_device(&id).await? {
                writeln!(out, "Blocked {id}")?;
            } else {
                writeln!(out, "{id} is already blocked")?;
            }
        }
        BlacklistCommand::Remove { id } => {
            let id = AppInstanceId::new(id);
            if services.blacklist.remove(&id).await? {
                writeln!(out, "Unblocked {id}")?;
            } else {
                writeln!(out, "{id} is not blocked")?;
            }
        }
    }
    Ok(())
}

async fn trust(command: TrustCommand, services: &AppServices, out: &mut impl Write) -> Result<()> {
    match command {
        TrustCommand::Status { id: Some(id) } => {
            let id = AppInstanceId::new(id);
            match services.channel.get_key(&id).await? {
                Some(key) => writeln!(out, "{id}: trusted ({})", fingerprint(&key))?,
                None => writeln!(out, "{id}: untrusted")?,
            }
        }
        TrustCommand::Status { id: None } => {
            let ids = services.trust_store.list_ids().await?;
            if ids.is_empty() {
                writeln!(out, "No trusted devices")?;
            }
            for id in ids {
                if let Some(key) = services.trust_store.get_key(&id).await? {
                    writeln!(out, "{:<38} {}", id.as_str(), fingerprint(&key))?;
                }
            }
        }
        TrustCommand::Revoke { id } => {
            let id = AppInstanceId::new(id);
            services.channel.delete(&id).await?;
            services.pairing.forget(&id).await;
            services
                .registry
                .update_connect_state(&id, SyncState::Unverified)
                .await?;
            writeln!(out, "Revoked trust for {id}")?;
        }
    }
    Ok(())
}

fn fingerprint(key: &[u8]) -> String {
    IdentityFingerprint::from_public_key(key)
        .map(|fp| fp.as_display().to_string())
        .unwrap_or_else(|_| "<invalid key>".to_string())
}
