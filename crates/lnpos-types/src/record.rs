//! Device record types.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ParseError, ParseResult};

/// Value the backend uses for "do not show a price".
pub const SHOW_PRICE_NONE: &str = "None";

/// `extra` marker for ATMs backed by the Boltz swap integration.
pub const EXTRA_BOLTZ: &str = "boltz";

/// Kind of terminal a record describes.
///
/// Unknown kinds are kept verbatim so that records written by newer
/// backends survive a round trip through the panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DeviceKind {
    /// Point-of-sale terminal.
    #[default]
    Pos,
    /// ATM-style terminal that pays out.
    Atm,
    /// Relay switch.
    Switch,
    /// Any other kind reported by the backend.
    Other(String),
}

impl DeviceKind {
    /// The wire representation of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            DeviceKind::Pos => "pos",
            DeviceKind::Atm => "atm",
            DeviceKind::Switch => "switch",
            DeviceKind::Other(s) => s,
        }
    }

    /// Short human-readable label used in tables.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            DeviceKind::Pos => "PoS",
            DeviceKind::Atm => "ATM",
            DeviceKind::Switch => "Switch",
            DeviceKind::Other(s) => s,
        }
    }
}

impl From<&str> for DeviceKind {
    fn from(s: &str) -> Self {
        match s {
            "pos" => DeviceKind::Pos,
            "atm" => DeviceKind::Atm,
            "switch" => DeviceKind::Switch,
            other => DeviceKind::Other(other.to_string()),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DeviceKind::from(s))
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeviceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(DeviceKind::from(s.as_str()))
    }
}

/// A device record as stored by the backend, or a draft of one.
///
/// Every field is optional because the same shape is used for drafts that
/// have not been submitted yet. A record that exists server-side always
/// carries an `id`. Fields the backend returns that are not modelled here
/// are kept in [`DeviceRecord::other`] and sent back on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display credential derived by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Owning wallet identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceKind>,
    /// Markup factor applied on top of the exchange rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    /// Base amount for fixed-amount modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lnurl_toggle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_message: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_ack: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_price: Option<String>,
    /// Backend integration marker, e.g. [`EXTRA_BOLTZ`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// Written when the form dialog is closed. Nothing reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    /// Fields returned by the backend that this type does not model.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl DeviceRecord {
    /// Draft with every display flag off and an empty title.
    ///
    /// This is what the form dialog holds after it has been cleared.
    #[must_use]
    pub fn cleared() -> Self {
        Self {
            title: Some(String::new()),
            lnurl_toggle: Some(false),
            show_message: Some(false),
            show_ack: Some(false),
            show_price: Some(SHOW_PRICE_NONE.to_string()),
            ..Default::default()
        }
    }

    /// Draft the form dialog starts with before anything was edited.
    #[must_use]
    pub fn creation_draft() -> Self {
        Self {
            device: Some(DeviceKind::Pos),
            profit: Some(1.0),
            amount: Some(1.0),
            ..Self::cleared()
        }
    }

    /// Draft left behind by an explicit close of the form dialog.
    #[must_use]
    pub fn closed_draft() -> Self {
        Self {
            is_unique: Some(false),
            ..Default::default()
        }
    }

    /// Parse a record from a JSON document.
    pub fn from_json(json: &str) -> ParseResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this record into a JSON object.
    pub fn to_object(&self) -> ParseResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ParseError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// Whether the record exists server-side.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Whether this is an ATM using the Boltz integration.
    #[must_use]
    pub fn is_boltz_atm(&self) -> bool {
        self.device == Some(DeviceKind::Atm) && self.extra.as_deref() == Some(EXTRA_BOLTZ)
    }
}

/// Number of characters shown for an id in compact tables.
pub const SHORT_ID_LEN: usize = 5;

/// A record as shown in the registry table.
///
/// `data` is the authoritative record returned by the backend; the other
/// fields are derived from it for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedDevice {
    /// Record id. Always equal to `data.id`.
    pub id: String,
    /// Leading characters of the id.
    pub short_id: String,
    /// Human-readable device kind.
    pub kind_label: String,
    /// The record itself.
    pub data: DeviceRecord,
}

impl ListedDevice {
    /// Map a backend record into a table row.
    ///
    /// Returns `None` for records without an id, which cannot be addressed.
    #[must_use]
    pub fn from_record(data: DeviceRecord) -> Option<Self> {
        let id = data.id.clone().filter(|id| !id.is_empty())?;
        let short_id = id.chars().take(SHORT_ID_LEN).collect();
        let kind_label = data
            .device
            .as_ref()
            .map(|d| d.label().to_string())
            .unwrap_or_default();
        Some(Self {
            id,
            short_id,
            kind_label,
            data,
        })
    }

    /// Whether any searchable column contains `needle`, ignoring case.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        [
            self.data.title.as_deref(),
            Some(self.id.as_str()),
            self.data.key.as_deref(),
            self.data.wallet.as_deref(),
            self.data.currency.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}
