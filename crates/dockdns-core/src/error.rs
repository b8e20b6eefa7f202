//! Error types for the dockdns system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for dockdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dockdns system
#[derive(Error, Debug)]
pub enum Error {
    /// Container runtime errors (listing containers or services)
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// TTL annotation present but not a valid TTL
    #[error("Invalid TTL annotation {key}={value:?}: {reason}")]
    InvalidTtl {
        /// Annotation key the value was read from
        key: String,
        /// Raw annotation value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (snapshot files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a runtime error
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid TTL error
    pub fn invalid_ttl(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTtl {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from parsing container annotations
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::InvalidTtl { .. })
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
