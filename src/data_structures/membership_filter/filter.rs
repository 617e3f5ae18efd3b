// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Main implementation of the membership filter.

use std::fmt;

use super::config::MembershipFilterConfig;
use super::error::{MembershipFilterError, Result};
use super::hash::{MultiHasher, SeededFnvHasher};
use crate::data_structures::normalize_key;

/// A Bloom filter over case-insensitive text keys.
///
/// `contains` answers either "definitely absent" (`false`) or "possibly
/// present" (`true`). Every key passed to [`MembershipFilter::add`] is
/// reported as present afterwards; keys that were never added may be
/// reported as present with a probability that grows as the array fills.
///
/// Size and number of hash rounds are fixed at construction. There is no
/// removal; growing the filter means building a new one from the full key set.
///
/// # Examples
///
/// ```
/// use stockroom_lib::data_structures::membership_filter::MembershipFilter;
///
/// let mut filter = MembershipFilter::new(1_000, 3).unwrap();
/// filter.add("Rice 5kg");
///
/// assert!(filter.contains("rice 5kg"));
/// assert!(!filter.contains("flour"));
/// ```
#[derive(Debug, Clone)]
pub struct MembershipFilter {
    /// Bit array, 64 bits per word
    words: Vec<u64>,

    /// Number of addressable bits
    size_bits: usize,

    /// Number of hash rounds per key
    hash_rounds: usize,

    /// Number of `add` calls since construction or the last `clear`
    keys_added: usize,

    /// Hasher for computing bit positions
    hasher: SeededFnvHasher,
}

impl MembershipFilter {
    /// Create an all-zero filter of `size_bits` bits using `hash_rounds` hashes per key.
    pub fn new(size_bits: usize, hash_rounds: usize) -> Result<Self> {
        if size_bits == 0 {
            return Err(MembershipFilterError::InvalidConfiguration(
                "size_bits must be greater than 0".to_string(),
            ));
        }
        if hash_rounds == 0 {
            return Err(MembershipFilterError::InvalidConfiguration(
                "hash_rounds must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            words: vec![0; size_bits.div_ceil(64)],
            size_bits,
            hash_rounds,
            keys_added: 0,
            hasher: SeededFnvHasher,
        })
    }

    /// Create a filter sized by the given configuration.
    pub fn with_config(config: &MembershipFilterConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.size_bits(), config.hash_rounds())
    }

    /// Add a key to the filter. The key is lowercased first.
    ///
    /// # Returns
    ///
    /// `true` if at least one bit changed, `false` if the key was likely already present.
    pub fn add(&mut self, key: &str) -> bool {
        let key = normalize_key(key);
        let positions = self.hasher.positions(&key, self.hash_rounds, self.size_bits);

        let mut changed = false;
        for bit_pos in positions {
            let word = &mut self.words[bit_pos / 64];
            let bit_mask = 1u64 << (bit_pos % 64);
            if *word & bit_mask == 0 {
                *word |= bit_mask;
                changed = true;
            }
        }

        self.keys_added += 1;
        changed
    }

    /// Returns `true` if the key might have been added, `false` if it definitely was not.
    pub fn contains(&self, key: &str) -> bool {
        let key = normalize_key(key);
        self.hasher
            .positions(&key, self.hash_rounds, self.size_bits)
            .into_iter()
            .all(|bit_pos| self.words[bit_pos / 64] & (1u64 << (bit_pos % 64)) != 0)
    }

    /// Reset the filter to the empty state.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
        self.keys_added = 0;
    }

    /// Fraction of bits currently set, between 0.0 and 1.0.
    pub fn fill_ratio(&self) -> f64 {
        self.set_bits() as f64 / self.size_bits as f64
    }

    /// Estimated probability that `contains` reports a never-added key, `fill_ratio^k`.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.hash_rounds as i32)
    }

    /// Number of set bits.
    pub fn set_bits(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Size of the bit array in bits.
    pub fn size_bits(&self) -> usize {
        self.size_bits
    }

    /// Number of hash rounds per key.
    pub fn hash_rounds(&self) -> usize {
        self.hash_rounds
    }

    /// Number of `add` calls since construction or the last `clear`.
    pub fn keys_added(&self) -> usize {
        self.keys_added
    }
}

impl fmt::Display for MembershipFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MembershipFilter(size={}, rounds={}, filled={}/{})",
            self.size_bits,
            self.hash_rounds,
            self.set_bits(),
            self.size_bits
        )
    }
}
