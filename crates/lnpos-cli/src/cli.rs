//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lnpos_types::{DeviceKind, DeviceRecord};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "lnpos")]
#[command(author, version, about = "Manage LNURL point-of-sale devices", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "LNPOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "LNPOS_URL")]
    pub url: Option<String>,

    /// Extension mount path (lnurldevice or lnpos)
    #[arg(long, global = true)]
    pub mount: Option<String>,

    /// Wallet admin key
    #[arg(long, global = true, env = "LNPOS_ADMIN_KEY", hide_env_values = true)]
    pub admin_key: Option<String>,

    /// Wallet invoice key, handed to the display view
    #[arg(long, global = true, env = "LNPOS_INVOICE_KEY", hide_env_values = true)]
    pub invoice_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered devices
    List {
        /// Only show devices whose title, id, key, wallet or currency contains TEXT
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Fetch one device and hand it to the display view
    Show {
        /// Device id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Register a new device
    Create {
        /// Device title
        #[arg(long)]
        title: String,

        #[command(flatten)]
        fields: DeviceFields,
    },

    /// Change an existing device
    Update {
        /// Device id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: DeviceFields,
    },

    /// Delete a device
    Delete {
        /// Device id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the device table as CSV
    Export {
        /// Write to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List currencies selectable for a device
    Currencies,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Optional device fields shared by `create` and `update`.
#[derive(Debug, Clone, Default, Args)]
pub struct DeviceFields {
    /// Device kind (pos, atm, switch)
    #[arg(long, value_name = "KIND")]
    pub device: Option<DeviceKind>,

    /// Denomination currency
    #[arg(long)]
    pub currency: Option<String>,

    /// Profit margin in percent
    #[arg(long)]
    pub profit: Option<f64>,

    /// Fixed amount
    #[arg(long)]
    pub amount: Option<f64>,

    /// Free-form extra setting (e.g. "boltz")
    #[arg(long)]
    pub extra: Option<String>,

    /// Wallet id to attach the device to
    #[arg(long)]
    pub wallet: Option<String>,
}

impl DeviceFields {
    /// Overwrite the fields given on the command line.
    pub fn apply(&self, draft: &mut DeviceRecord) {
        if let Some(device) = &self.device {
            draft.device = Some(device.clone());
        }
        if let Some(currency) = &self.currency {
            draft.currency = Some(currency.clone());
        }
        if let Some(profit) = self.profit {
            draft.profit = Some(profit);
        }
        if let Some(amount) = self.amount {
            draft.amount = Some(amount);
        }
        if let Some(extra) = &self.extra {
            draft.extra = Some(extra.clone());
        }
        if let Some(wallet) = &self.wallet {
            draft.wallet = Some(wallet.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration (keys redacted)
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
