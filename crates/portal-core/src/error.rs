//! Error handling for the portal core crate.

use thiserror::Error;

/// Result type alias using the core error type.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised while loading client configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
