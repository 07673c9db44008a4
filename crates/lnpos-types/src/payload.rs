//! Outbound request bodies built from drafts.
//!
//! The backend treats a missing field and a falsy field the same way, so
//! drafts are submitted with every falsy value removed: `false`, `0`, the
//! empty string and `null` never go over the wire.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ParseResult;
use crate::record::DeviceRecord;

/// Whether a JSON value counts as set when submitting a draft.
///
/// Arrays and objects are always truthy, even when empty.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// JSON body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Build a payload from the truthy fields of `draft`.
    pub fn from_draft(draft: &DeviceRecord) -> ParseResult<Self> {
        let fields = draft
            .to_object()?
            .into_iter()
            .filter(|(_, value)| is_truthy(value))
            .collect();
        Ok(Self(fields))
    }

    /// The record id carried by this payload, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Names of the fields that will be sent.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the payload, returning the JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
