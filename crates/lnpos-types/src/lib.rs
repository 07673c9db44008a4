//! Shared types for LNURL point-of-sale device registries.
//!
//! This crate holds the data model used by both the HTTP client and the
//! registry panel in `lnpos-core`:
//!
//! - [`DeviceRecord`]: a device record or a draft of one
//! - [`ListedDevice`]: a record mapped for table display
//! - [`Payload`]: the falsy-stripped body sent on create and update
//! - [`selectable_currencies`]: the currency list offered in forms
//!
//! # Example
//!
//! ```
//! use lnpos_types::{DeviceKind, DeviceRecord, Payload};
//!
//! let draft = DeviceRecord {
//!     title: Some("Shop A".into()),
//!     device: Some(DeviceKind::Pos),
//!     profit: Some(0.0),
//!     ..Default::default()
//! };
//! let payload = Payload::from_draft(&draft).unwrap();
//! assert!(payload.contains("title"));
//! assert!(!payload.contains("profit"));
//! ```

pub mod currency;
pub mod error;
pub mod payload;
pub mod record;

pub use currency::selectable_currencies;
pub use error::{ParseError, ParseResult};
pub use payload::{Payload, is_truthy};
pub use record::{DeviceKind, DeviceRecord, EXTRA_BOLTZ, ListedDevice, SHOW_PRICE_NONE};
