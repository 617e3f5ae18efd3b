//! Data structures behind the product search index.
//!
//! Both structures treat keys case-insensitively through [`normalize_key`],
//! so a key added to one is found under the same spelling in the other.
//! All implementations adhere to the project requirements:
//! - No unsafe code
//! - No recursion proportional to key length
//! - Deterministic results for identical contents

pub mod membership_filter;
pub mod prefix_index;

// Re-export common data structures
pub use membership_filter::{MembershipFilter, MembershipFilterConfig, MembershipFilterError};
pub use prefix_index::{PrefixIndex, PrefixMatches};

/// Normalize a key for case-insensitive indexing.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}
