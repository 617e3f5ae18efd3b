//! Search index configuration module.
//!
//! This module sizes the membership filter that fronts the product name trie.
//! The filter holds every prefix of every product name, so `expected_keys`
//! counts prefixes: roughly the number of products times the average name
//! length.

use super::{ConfigResult, Validate};
use crate::data_structures::MembershipFilterConfig;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest filter the configuration accepts: 2^31 bits, 256 MiB of memory.
pub const MAX_FILTER_SIZE_BITS: usize = 1 << 31;

/// Search index configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Expected number of filter keys (name prefixes)
    pub expected_keys: usize,

    /// Target false positive rate of the filter
    pub false_positive_rate: f64,

    /// Explicit filter size in bits, overriding the computed size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bits: Option<usize>,

    /// Explicit number of hash rounds, overriding the computed count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_rounds: Option<usize>,

    /// Cap on the computed filter size in bits
    pub max_size_bits: usize,

    /// Fill ratio above which a rebuild logs a saturation warning
    pub saturation_warning_ratio: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            expected_keys: 50_000,
            false_positive_rate: 0.01,
            size_bits: None,
            hash_rounds: None,
            max_size_bits: 1 << 30,
            saturation_warning_ratio: 0.5,
        }
    }
}

impl IndexConfig {
    /// Build the membership filter configuration described by this section.
    pub fn filter_config(&self) -> MembershipFilterConfig {
        let mut config = MembershipFilterConfig::new()
            .with_expected_keys(self.expected_keys)
            .with_false_positive_rate(self.false_positive_rate)
            .with_max_size_bits(self.max_size_bits);
        if let Some(size_bits) = self.size_bits {
            config = config.with_size_bits(size_bits);
        }
        if let Some(hash_rounds) = self.hash_rounds {
            config = config.with_hash_rounds(hash_rounds);
        }
        config
    }
}

impl Validate for IndexConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_size_bits == 0 || self.max_size_bits > MAX_FILTER_SIZE_BITS {
            return Err(ConfigError::ValueOutOfRange {
                key: "index.max_size_bits".to_string(),
                message: format!("must be in 1..={MAX_FILTER_SIZE_BITS}"),
            });
        }
        if let Some(size_bits) = self.size_bits.filter(|&bits| bits > self.max_size_bits) {
            return Err(ConfigError::ValueOutOfRange {
                key: "index.size_bits".to_string(),
                message: format!(
                    "{size_bits} exceeds index.max_size_bits {}",
                    self.max_size_bits
                ),
            });
        }

        self.filter_config()
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if !(self.saturation_warning_ratio > 0.0 && self.saturation_warning_ratio <= 1.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "index.saturation_warning_ratio".to_string(),
                message: "must be in (0.0, 1.0]".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(IndexConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overrides_reach_filter_config() {
        let config = IndexConfig {
            size_bits: Some(1_000),
            hash_rounds: Some(3),
            ..Default::default()
        };
        let filter = config.filter_config();
        assert_eq!(filter.size_bits(), 1_000);
        assert_eq!(filter.hash_rounds(), 3);
    }

    #[test]
    fn test_huge_key_count_is_capped() {
        let config = IndexConfig {
            expected_keys: 1_000_000_000_000,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.filter_config().size_bits(), config.max_size_bits);
    }

    #[test]
    fn test_oversized_filter_is_rejected() {
        let explicit = IndexConfig {
            size_bits: Some((1 << 30) + 1),
            ..Default::default()
        };
        assert!(matches!(
            explicit.validate(),
            Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "index.size_bits"
        ));

        let cap = IndexConfig {
            max_size_bits: MAX_FILTER_SIZE_BITS + 1,
            ..Default::default()
        };
        assert!(matches!(
            cap.validate(),
            Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "index.max_size_bits"
        ));
    }

    #[test]
    fn test_invalid_rate_is_rejected() {
        let config = IndexConfig {
            false_positive_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
