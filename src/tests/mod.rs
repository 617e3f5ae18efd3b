//! Test modules for Stockroom.
//!
//! This module contains the crate-internal test suite:
//! - Configuration loading and validation
//! - Error types and the error reporter
//! - Property-based tests of the search index and ledger using proptest
//! - Shared fixtures and strategies


// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{product_name_strategy, products_strategy, TestFixture};
