//! Error types for lnpos-core.
//!
//! Every failure the panel can hit is reported as an [`Error`] to the
//! [`Notifier`](crate::Notifier). None of them is fatal: the panel stays
//! usable and the user retries by repeating the action.
//!
//! | Error | Source |
//! |-------|--------|
//! | [`Error::RequestFailed`] | Backend answered with a non-success status |
//! | [`Error::NotReachable`] | Connection refused, DNS failure, timeout |
//! | [`Error::Decode`] | Response body is not the expected JSON |
//! | [`Error::MissingId`] | A record without an id where one is required |
//! | [`Error::Scratch`] | Scratch storage could not be read or written |
//! | [`Error::Export`] | CSV export failed |

use thiserror::Error;

use lnpos_types::ParseError;

/// Errors that can occur while talking to the device registry backend.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The backend rejected the request.
    #[error("Request failed ({status}): {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// The backend could not be reached.
    #[error("Backend not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP transport error after the connection was established.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A record could not be converted for submission.
    #[error(transparent)]
    Record(#[from] ParseError),

    /// Invalid backend URL or mount path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A record that must be addressed by id has none.
    #[error("Device record has no id")]
    MissingId,

    /// Scratch storage failure.
    #[error("Scratch storage error: {0}")]
    Scratch(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV export failed.
    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),
}

impl Error {
    /// HTTP status of a rejected request, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RequestFailed { status, .. } => Some(*status),
            Error::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build a [`Error::RequestFailed`].
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Error::RequestFailed {
            status,
            message: message.into(),
        }
    }
}

/// Result type alias using lnpos-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
