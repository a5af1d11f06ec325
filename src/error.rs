//! Error types for configuration synchronization.
//!
//! The coalescing queue itself never surfaces errors to producers (see
//! [`crate::queue`]); these variants are returned by the merge entry points,
//! the transport, and the configuration server.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors produced while merging, transporting or serving configuration.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An edit was not mapping-shaped at its top level.
    #[error("edit must be a JSON object, got {0}")]
    InvalidEdit(&'static str),

    /// A merge was requested against a base or edit that is not a mapping.
    #[error("cannot merge {edit} into {base}")]
    MergeTypeMismatch {
        /// Shape of the base document.
        base: &'static str,
        /// Shape of the edit document.
        edit: &'static str,
    },

    /// The remote side answered a write or read with a non-success status.
    #[error("transport failure ({status}): {message}")]
    TransportFailure {
        /// HTTP status code returned by the remote resource.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A body could not be encoded or decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the persisted configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A resource URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A queue was created outside of a tokio runtime.
    #[error("no tokio runtime available to drive writes")]
    NoRuntime,
}

impl SyncError {
    /// Whether the error came from the remote round trip rather than local input.
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::TransportFailure { .. } | SyncError::Http(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SyncError::TransportFailure {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => SyncError::Http(err.to_string()),
        }
    }
}
