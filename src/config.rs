//! Configuration Module
//!
//! This module defines all configuration structures for the selector.
//! Configuration is loaded from TOML files and parsed using serde.

use ethers::types::{Address, U256};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Raised when a configuration value names something that does not exist
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown selector type {0:?}, expected \"acceptall\" or \"base\"")]
    UnknownSelectorType(String),
    #[error("unknown sorter type {0:?}, expected \"bycostandtime\" or \"bycostandnonce\"")]
    UnknownSorterType(String),
}

/// Main configuration structure
///
/// # Example TOML
/// ```toml
/// proposer = "0x000000000000000000000000000000000000beef"
/// pending_file = "config/pending.json"
///
/// [selector]
/// selector_type = "base"
/// sorter_type = "bycostandtime"
/// selection_time_ms = 500
///
/// [batch]
/// max_cumulative_gas = 30000000
///
/// [[genesis]]
/// address = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
/// balance = "0xde0b6b3a7640000"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address credited with the fees of the batch
    pub proposer: Address,
    /// JSON array of pending transactions fed to the pool at startup
    #[serde(default)]
    pub pending_file: Option<String>,
    pub selector: SelectorConfig,
    pub batch: BatchConfig,
    #[serde(default)]
    pub genesis: Vec<GenesisAccount>,
}

/// Selector configuration
///
/// # Supported values
/// - `selector_type`: `"acceptall"` (no validation) or `"base"` (sorter + processor feedback)
/// - `sorter_type`: `"bycostandtime"` or `"bycostandnonce"`; ignored by `"acceptall"`
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    pub selector_type: String,
    pub sorter_type: String,
    /// Wall-clock budget of one selection round
    pub selection_time_ms: u64,
}

/// Batch simulation limits
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub max_cumulative_gas: u64,
}

/// Initial account funding for the batch simulator
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    pub balance: U256,
    #[serde(default)]
    pub nonce: u64,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        proposer = "0x000000000000000000000000000000000000beef"

        [selector]
        selector_type = "base"
        sorter_type = "bycostandnonce"
        selection_time_ms = 250

        [batch]
        max_cumulative_gas = 100000

        [[genesis]]
        address = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        balance = "0xde0b6b3a7640000"
    "#;

    #[test]
    fn test_parse_sample_config() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.selector.selector_type, "base");
        assert_eq!(config.selector.sorter_type, "bycostandnonce");
        assert_eq!(config.selector.selection_time_ms, 250);
        assert_eq!(config.batch.max_cumulative_gas, 100_000);
        assert_eq!(config.pending_file, None);
        assert_eq!(config.genesis.len(), 1);
        assert_eq!(config.genesis[0].balance, U256::exp10(18));
        assert_eq!(config.genesis[0].nonce, 0);
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let result = Config::parse("proposer = \"0x000000000000000000000000000000000000beef\"");
        assert!(result.is_err());
    }
}
