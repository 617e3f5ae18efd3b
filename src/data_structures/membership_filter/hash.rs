// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Hashing utilities for the membership filter.
//!
//! Each hash round is an independent FNV-1a digest over the round index
//! followed by the key bytes. FNV alone spreads short, similar keys poorly,
//! so every digest goes through the MurmurHash3 64-bit finalizer before it
//! is reduced modulo the bit array size.

use std::hash::Hasher;

/// A trait for computing the bit positions a key occupies.
pub(crate) trait MultiHasher {
    /// Compute one bit position per round.
    ///
    /// # Arguments
    ///
    /// * `key` - The already-normalized key
    /// * `rounds` - The number of hash rounds
    /// * `size_bits` - The size of the bit array; every position is below it
    fn positions(&self, key: &str, rounds: usize, size_bits: usize) -> Vec<usize>;
}

/// Round-seeded FNV-1a hasher.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SeededFnvHasher;

impl MultiHasher for SeededFnvHasher {
    fn positions(&self, key: &str, rounds: usize, size_bits: usize) -> Vec<usize> {
        let size = size_bits as u64;
        (0..rounds)
            .map(|round| (round_hash(key, round as u32) % size) as usize)
            .collect()
    }
}

/// Hash `key` for a single round.
fn round_hash(key: &str, round: u32) -> u64 {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(&round.to_le_bytes());
    hasher.write(key.as_bytes());
    finalize(hasher.finish())
}

/// MurmurHash3 `fmix64`.
fn finalize(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_positions_within_bounds() {
        let hasher = SeededFnvHasher;
        let positions = hasher.positions("rice 5kg", 10, 1000);

        assert_eq!(positions.len(), 10);
        assert!(positions.iter().all(|&p| p < 1000));

        let unique = positions.iter().collect::<HashSet<_>>();
        assert!(unique.len() >= 5);
    }

    #[test]
    fn test_hash_stability() {
        let hasher = SeededFnvHasher;
        assert_eq!(
            hasher.positions("stable", 5, 1023),
            hasher.positions("stable", 5, 1023)
        );
    }

    #[test]
    fn test_rounds_are_not_shifted_copies() {
        // Two keys that agree on round 0 should still disagree on later rounds.
        let hasher = SeededFnvHasher;
        let a = hasher.positions("a", 4, 1 << 20);
        let b = hasher.positions("b", 4, 1 << 20);
        assert_ne!(a, b);
        assert_ne!(a[1] as i64 - a[0] as i64, b[1] as i64 - b[0] as i64);
    }

    #[test]
    fn test_finalize_avalanche() {
        let diff = (finalize(1) ^ finalize(2)).count_ones();
        assert!(diff > 16);
    }
}
