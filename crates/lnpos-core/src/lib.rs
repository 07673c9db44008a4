//! Client and registry panel for LNURL point-of-sale device records.
//!
//! This crate talks to the device registry REST API of an LNbits-style
//! backend and keeps a local, table-ready view of the records in step with
//! it.
//!
//! # Features
//!
//! - **HTTP client**: [`ApiClient`] covers the five registry endpoints and
//!   the shared currency list, under either historical mount path
//! - **Panel**: [`Panel`] holds the record list and dialog state and folds
//!   successful responses into the list
//! - **Export**: CSV export of the registry table
//! - **Scratch storage**: records handed to the display view
//! - **Testing**: [`MockApi`] in-memory backend with failure injection
//!
//! # Quick Start
//!
//! ```no_run
//! use lnpos_core::{ApiClient, Panel, Wallet, DEFAULT_MOUNT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::new("http://localhost:5000", DEFAULT_MOUNT)?;
//!     let wallet = Wallet {
//!         id: "wallet-id".into(),
//!         adminkey: "admin-key".into(),
//!         inkey: "invoice-key".into(),
//!     };
//!
//!     let mut panel = Panel::new(api, wallet);
//!     panel.init().await;
//!
//!     for row in panel.records() {
//!         println!("{} {}", row.id, row.data.title.as_deref().unwrap_or(""));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod export;
pub mod mock;
pub mod panel;
pub mod scratch;
pub mod traits;

// Re-export lnpos-types for downstream users
pub use lnpos_types as types;

pub use client::{ApiClient, DEFAULT_MOUNT, DEFAULT_TIMEOUT, LEGACY_MOUNT};
pub use error::{Error, Result};
pub use export::{COLUMNS, Column, write_csv};
pub use mock::{MockApi, MockConfirm, MockNotifier, MockRequest, Operation};
pub use panel::{DELETE_PROMPT, FormDialog, Panel, SettingsDialog, Wallet};
pub use scratch::{FileScratch, MemoryScratch, ScratchStore};
pub use traits::{Confirm, DeviceApi, LogNotifier, Notifier, StaticConfirm};

pub use lnpos_types::{DeviceKind, DeviceRecord, ListedDevice, Payload};
