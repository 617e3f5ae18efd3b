// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Membership filter for fast rejection of product name lookups.
//!
//! A space-efficient probabilistic set over text keys. The catalog index
//! feeds it every prefix of every product name, so a "definitely absent"
//! answer lets a search return without walking the trie at all.
//!
//! # Features
//!
//! - No false negatives: every added key is reported as present.
//! - Configurable false positive rate and memory usage.
//! - Case-insensitive: keys are lowercased on both add and query.
//! - Zero unsafe code.
//!
//! # Example
//!
//! ```
//! use stockroom_lib::data_structures::membership_filter::{MembershipFilter, MembershipFilterConfig};
//!
//! let config = MembershipFilterConfig::new()
//!     .with_expected_keys(1_000)
//!     .with_false_positive_rate(0.001);
//! let mut filter = MembershipFilter::with_config(&config).unwrap();
//!
//! filter.add("Basmati Rice");
//! assert!(filter.contains("basmati rice"));
//! assert!(!filter.contains("jasmine rice"));
//! ```

// Module declarations
mod config;
mod error;
mod filter;
mod hash;

// Re-exports
pub use config::MembershipFilterConfig;
pub use error::{MembershipFilterError, Result};
pub use filter::MembershipFilter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut filter = MembershipFilter::with_config(&MembershipFilterConfig::default()).unwrap();

        filter.add("hello");
        filter.add("world");

        assert!(filter.contains("hello"));
        assert!(filter.contains("world"));
        assert!(!filter.contains("test"));
    }

    #[test]
    fn test_invalid_configuration_is_reported() {
        let config = MembershipFilterConfig::new().with_false_positive_rate(2.0);
        assert!(matches!(
            MembershipFilter::with_config(&config),
            Err(MembershipFilterError::InvalidConfiguration(_))
        ));
    }
}
