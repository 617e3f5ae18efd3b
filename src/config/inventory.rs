//! Inventory configuration module.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inventory configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// JSON stock file the CLI loads and saves
    pub data_file: PathBuf,

    /// Products with fewer units than this are reported as low stock
    pub low_stock_threshold: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/stock.json"),
            low_stock_threshold: 30,
        }
    }
}

impl Validate for InventoryConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "inventory.data_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
