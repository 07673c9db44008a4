//! Command-line interface for the LNURL point-of-sale device registry.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | List registered devices |
//! | `show` | Fetch one device and hand it to the display view |
//! | `create` | Register a new device |
//! | `update` | Change an existing device |
//! | `delete` | Delete a device after confirmation |
//! | `export` | Export the device table as CSV |
//! | `currencies` | List selectable currencies |
//! | `config` | Manage the configuration file |
//!
//! # Configuration
//!
//! Settings live in `~/.config/lnpos/config.toml` (or the platform
//! equivalent). `--url`, `--mount`, `--admin-key` and `--invoice-key`
//! override the file; the `LNPOS_URL`, `LNPOS_ADMIN_KEY` and
//! `LNPOS_INVOICE_KEY` environment variables do the same.
//!
//! ```bash
//! lnpos config init
//! lnpos --admin-key 0123abcd list --filter shop
//! lnpos create --title "Front desk" --currency EUR --profit 2
//! lnpos export --output devices.csv
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod util;

// Re-export core dependencies for convenience
pub use lnpos_core;
pub use lnpos_types;
