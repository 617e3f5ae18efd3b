// Copyright (c) 2025 Stockroom Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the membership filter.

/// Errors that can occur when building a membership filter.
///
/// Queries and insertions never fail; only construction is validated.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum MembershipFilterError {
    /// The filter has an invalid configuration
    #[error("Invalid filter configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for membership filter operations
pub type Result<T> = std::result::Result<T, MembershipFilterError>;
