//! Error types for the updater
//!
//! This module defines all error types used throughout the updater,
//! using `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Settings store missing, unreadable, unwritable, or malformed
    #[error("config error: {0}")]
    Config(String),

    /// Every discovery endpoint was tried and none produced an address
    #[error("external address unavailable: all {attempted} discovery endpoint(s) failed")]
    NoIpAvailable {
        /// Number of endpoints that were tried
        attempted: usize,
    },

    /// Transport-level HTTP failure
    #[error("http error: {0}")]
    Http(String),

    /// Provider answered in a form that could not be used
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
