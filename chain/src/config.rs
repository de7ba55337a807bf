//! Chain configuration with TOML file support.

use crate::genesis::GenesisState;
use crate::logging::{init_logging, LogFormat};
use crate::ChainError;
use duo_fees::FeeSchedule;
use duo_types::ChainParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to start a chain.
///
/// Can be loaded from a TOML file via [`ChainConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Missing sections fall back to
/// their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter, e.g. "info" or "debug,duo_evaluator=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub parameters: ChainParameters,

    #[serde(default)]
    pub fee_schedule: FeeSchedule,

    #[serde(default)]
    pub genesis: GenesisState,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ChainConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ChainError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ChainError> {
        toml::from_str(s).map_err(|e| ChainError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ChainError> {
        toml::to_string_pretty(self).map_err(|e| ChainError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, ChainError> {
        self.log_format.parse()
    }

    /// Install the global subscriber with the configured format and level.
    pub fn init_logging(&self) -> Result<(), ChainError> {
        init_logging(self.log_format()?, &self.log_level)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            parameters: ChainParameters::default(),
            fee_schedule: FeeSchedule::default(),
            genesis: GenesisState::default(),
        }
    }
}
