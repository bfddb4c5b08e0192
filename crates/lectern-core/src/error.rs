//! Error types for talking to the material API.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while listing, uploading or deleting materials.
///
/// Every variant collapses into the same "request failed" outcome at the
/// screen level; the distinction only matters for logging.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection error (network failure, DNS resolution, timeout, etc.).
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },

    /// Response body could not be decoded as the expected JSON.
    #[error("failed to deserialize response: {0}")]
    Deserialization(String),

    /// A pending file could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Returns `true` if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
