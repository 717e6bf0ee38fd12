//! MediaVault error types

use thiserror::Error;

/// MediaVault error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The access gate refused the principal for this key
    #[error("Access denied: principal '{principal}' may not access '{key}'")]
    AccessDenied { key: String, principal: String },

    /// Payload retrieval failed; nothing was cached for the key
    #[error("Retrieval error for '{key}': {reason}")]
    Retrieval { key: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML decode error
    #[error("Config parse error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// TOML encode error
    #[error("Config encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failed operation may succeed if retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retrieval { .. })
    }
}

/// Result type alias for MediaVault operations
pub type Result<T> = std::result::Result<T, Error>;
