// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the membership filter.

use super::error::{MembershipFilterError, Result};

/// Hard cap on the computed number of hash rounds.
const MAX_HASH_ROUNDS: usize = 20;

/// Configuration for the membership filter.
///
/// The filter can be sized either from an expected key count and a target
/// false positive rate, or from an explicit bit count and number of hash
/// rounds. Explicit values win over computed ones.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipFilterConfig {
    /// Expected number of keys that will be inserted into the filter
    expected_keys: usize,

    /// Desired probability of false positives (0.0 to 1.0 exclusive)
    false_positive_rate: f64,

    /// Explicit size of the bit array in bits
    size_bits: Option<usize>,

    /// Explicit number of hash rounds
    hash_rounds: Option<usize>,

    /// Upper bound on the bit array size
    max_size_bits: Option<usize>,
}

impl MembershipFilterConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - expected_keys: 10,000
    /// - false_positive_rate: 0.01 (1%)
    /// - size_bits: None (computed)
    /// - hash_rounds: None (computed)
    /// - max_size_bits: None (unconstrained)
    pub fn new() -> Self {
        Self {
            expected_keys: 10_000,
            false_positive_rate: 0.01,
            size_bits: None,
            hash_rounds: None,
            max_size_bits: None,
        }
    }

    /// Set the expected number of keys to be inserted into the filter.
    pub fn with_expected_keys(mut self, expected_keys: usize) -> Self {
        self.expected_keys = expected_keys;
        self
    }

    /// Set the desired false positive rate (between 0.0 and 1.0 exclusive).
    pub fn with_false_positive_rate(mut self, false_positive_rate: f64) -> Self {
        self.false_positive_rate = false_positive_rate;
        self
    }

    /// Fix the size of the bit array instead of computing it.
    pub fn with_size_bits(mut self, size_bits: usize) -> Self {
        self.size_bits = Some(size_bits);
        self
    }

    /// Fix the number of hash rounds instead of computing it.
    pub fn with_hash_rounds(mut self, hash_rounds: usize) -> Self {
        self.hash_rounds = Some(hash_rounds);
        self
    }

    /// Cap the bit array size. A computed size above the cap is reduced to
    /// it; an explicit size above the cap is rejected by `validate`.
    pub fn with_max_size_bits(mut self, max_size_bits: usize) -> Self {
        self.max_size_bits = Some(max_size_bits);
        self
    }

    /// Check that the configuration describes a usable filter.
    pub fn validate(&self) -> Result<()> {
        if self.expected_keys == 0 {
            return Err(MembershipFilterError::InvalidConfiguration(
                "expected_keys must be greater than 0".to_string(),
            ));
        }
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(MembershipFilterError::InvalidConfiguration(
                "false_positive_rate must be between 0.0 and 1.0 exclusive".to_string(),
            ));
        }
        if self.size_bits == Some(0) {
            return Err(MembershipFilterError::InvalidConfiguration(
                "size_bits must be greater than 0".to_string(),
            ));
        }
        if self.hash_rounds == Some(0) {
            return Err(MembershipFilterError::InvalidConfiguration(
                "hash_rounds must be greater than 0".to_string(),
            ));
        }
        if let Some(max_size_bits) = self.max_size_bits {
            if max_size_bits == 0 {
                return Err(MembershipFilterError::InvalidConfiguration(
                    "max_size_bits must be greater than 0".to_string(),
                ));
            }
            if let Some(size_bits) = self.size_bits.filter(|&bits| bits > max_size_bits) {
                return Err(MembershipFilterError::InvalidConfiguration(format!(
                    "size_bits {size_bits} exceeds max_size_bits {max_size_bits}"
                )));
            }
        }
        Ok(())
    }

    /// Calculate the optimal bit array size.
    ///
    /// This uses the formula: m = -n*ln(p)/(ln(2)^2) where:
    /// - m = bit array size
    /// - n = expected number of keys
    /// - p = false positive probability
    ///
    /// The result is capped at `max_size_bits` when one is set.
    pub fn calculate_optimal_size_bits(&self) -> usize {
        let n = self.expected_keys as f64;
        let p = self.false_positive_rate;
        let m = -n * p.ln() / (std::f64::consts::LN_2 * std::f64::consts::LN_2);

        // `as` saturates at usize::MAX for oversized or non-finite m
        let bits = (m.ceil() as usize).max(1);
        match self.max_size_bits {
            Some(max_size_bits) => bits.min(max_size_bits),
            None => bits,
        }
    }

    /// Calculate the optimal number of hash rounds for the effective size.
    ///
    /// This uses the formula: k = (m/n)*ln(2), clamped to 1..=20.
    pub fn calculate_optimal_hash_rounds(&self) -> usize {
        let m = self.size_bits() as f64;
        let n = self.expected_keys as f64;
        let k = (m / n) * std::f64::consts::LN_2;
        (k.round() as usize).clamp(1, MAX_HASH_ROUNDS)
    }

    /// Get the effective size of the bit array in bits
    pub fn size_bits(&self) -> usize {
        self.size_bits
            .unwrap_or_else(|| self.calculate_optimal_size_bits())
    }

    /// Get the effective number of hash rounds
    pub fn hash_rounds(&self) -> usize {
        self.hash_rounds
            .unwrap_or_else(|| self.calculate_optimal_hash_rounds())
    }

    /// Get the expected number of keys
    pub fn expected_keys(&self) -> usize {
        self.expected_keys
    }

    /// Get the target false positive rate
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// Get the size cap, if any
    pub fn max_size_bits(&self) -> Option<usize> {
        self.max_size_bits
    }
}

impl Default for MembershipFilterConfig {
    fn default() -> Self {
        Self::new()
    }
}
