//! Error types for record handling in lnpos-types.

use thiserror::Error;

/// Errors that can occur when converting device records to or from JSON.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The record could not be represented as a JSON object.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The JSON document is not a valid device record.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using lnpos-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
