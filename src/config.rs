// Node configuration

use crate::ledger::Amount;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default location of the sled database
pub const DEFAULT_DATA_DIR: &str = ".stakeledger";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "stakeledger=info,stake=info";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a ledger node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the sled database
    pub data_dir: PathBuf,
    /// tracing-subscriber filter directive
    pub log_filter: String,
    /// Largest single faucet request; `None` for unlimited
    pub faucet_limit: Option<Amount>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            faucet_limit: Some(Amount::from_units(1_000)),
        }
    }
}

impl NodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_faucet_limit(mut self, limit: Option<Amount>) -> Self {
        self.faucet_limit = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir cannot be empty".to_string()));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter cannot be empty".to_string()));
        }
        if self.faucet_limit == Some(Amount::ZERO) {
            return Err(ConfigError::Invalid(
                "faucet_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
