//! Typed errors for metadata extraction.
//!
//! Only structural failures surface here. Missing or malformed metadata is
//! absorbed by the walker and never becomes an `ExtractError`.

use thiserror::Error;

/// Errors that abort an extraction call.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Destination is null, not a structure, or otherwise not writable
    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    /// A selector derived from an annotation key could not be evaluated
    #[error("document query failed for `{selector}`: {reason}")]
    DocumentQueryFailure { selector: String, reason: String },

    /// Dynamic schema declaration rejected
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Only http and https are fetched
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to read body of {url}: {reason}")]
    Body { url: String, reason: String },
}

impl ExtractError {
    pub(crate) fn invalid_target(reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            reason: reason.into(),
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
