//! MediaVault configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main MediaVault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaVaultConfig {
    /// Access policy configuration
    #[serde(default)]
    pub access: AccessConfig,

    /// Intrinsic store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Access policy configuration
///
/// The gate restricts every key starting with `restricted_prefix` to the
/// single `admin_principal`, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Key prefix marking a restricted resource
    pub restricted_prefix: String,

    /// Principal allowed to read restricted resources
    pub admin_principal: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            restricted_prefix: "private_".to_string(),
            admin_principal: "admin".to_string(),
        }
    }
}

/// Intrinsic store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix of synthesized payload bytes
    pub data_prefix: String,

    /// Upper bound for a single payload fetch, in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_prefix: "BINARY_DATA_OF_".to_string(),
            fetch_timeout_ms: 5_000,
        }
    }
}

impl MediaVaultConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations the gate or store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.access.restricted_prefix.is_empty() {
            return Err(Error::Config(
                "access.restricted_prefix must not be empty".to_string(),
            ));
        }
        if self.access.admin_principal.trim().is_empty() {
            return Err(Error::Config(
                "access.admin_principal must not be empty".to_string(),
            ));
        }
        if self.store.fetch_timeout_ms == 0 {
            return Err(Error::Config(
                "store.fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
