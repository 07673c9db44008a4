//! Command implementations for the CLI.

mod config;
mod devices;
mod edit;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use lnpos_core::scratch::DEVICE_KEY;
use lnpos_core::{ApiClient, Confirm, DeviceRecord, FileScratch, Panel, ScratchStore};

use crate::cli::Cli;
use crate::config::{Config, default_config_path};
use crate::util::ConsoleNotifier;

pub use config::cmd_config;
pub use devices::{cmd_currencies, cmd_export, cmd_list, cmd_show};
pub use edit::{cmd_create, cmd_delete, cmd_update};

/// Configuration file in effect for this invocation.
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(default_config_path)
}

/// Load the configuration file and apply command-line and environment
/// overrides on top.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(config_path(cli))?;
    if let Some(url) = &cli.url {
        config.server.url = url.clone();
    }
    if let Some(mount) = &cli.mount {
        config.server.mount = mount.clone();
    }
    if let Some(key) = &cli.admin_key {
        config.wallet.adminkey = key.clone();
    }
    if let Some(key) = &cli.invoice_key {
        config.wallet.inkey = key.clone();
    }
    Ok(config)
}

/// A panel wired to the configured backend and the console.
pub struct Session {
    pub panel: Panel<ApiClient>,
    notifier: Arc<ConsoleNotifier>,
    scratch: Arc<FileScratch>,
}

impl Session {
    pub fn open(config: &Config, confirm: impl Confirm + 'static) -> Result<Self> {
        let client = ApiClient::with_timeout(
            &config.server.url,
            &config.server.mount,
            config.server.timeout(),
        )
        .context("Invalid backend address")?;
        tracing::debug!(
            url = client.base_url(),
            mount = %client.mount(),
            "using device registry"
        );

        let notifier = Arc::new(ConsoleNotifier::new());
        let scratch = Arc::new(FileScratch::new(config.scratch_path()));
        let panel = Panel::new(client, config.wallet.clone())
            .with_notifier(Arc::clone(&notifier))
            .with_confirm(confirm)
            .with_scratch(Arc::clone(&scratch));

        Ok(Self {
            panel,
            notifier,
            scratch,
        })
    }

    /// Turn a panel operation's outcome into a command result.
    pub fn landed(&self, ok: bool, action: &str) -> Result<()> {
        if ok {
            return Ok(());
        }
        match self.notifier.take_last() {
            Some(message) => bail!("{} failed: {}", action, message),
            None => bail!("{} failed", action),
        }
    }

    /// The failure reported since the last check, if any.
    pub fn failure(&self) -> Option<String> {
        self.notifier.take_last()
    }

    /// The record last handed to the display view.
    pub fn displayed_record(&self) -> Result<DeviceRecord> {
        let json = self
            .scratch
            .get(DEVICE_KEY)?
            .with_context(|| format!("No record in {}", self.scratch.path().display()))?;
        Ok(DeviceRecord::from_json(&json)?)
    }
}
