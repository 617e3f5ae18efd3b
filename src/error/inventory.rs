//! Inventory error module.
//!
//! This module defines the recoverable errors raised by catalog lookups and
//! ledger operations. A rejected operation never leaves the catalog, its
//! index or any product partially modified.

use thiserror::Error;

/// Errors that can occur during catalog and ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// A sale asked for more units than are on hand.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        /// The product being sold
        product_id: String,
        /// Units on hand
        available: u32,
        /// Units requested
        requested: i64,
    },

    /// An administrative update or sale carried an unusable number.
    #[error("Invalid {field} value {value}: {reason}")]
    InvalidValue {
        /// The field being written
        field: &'static str,
        /// The rejected input
        value: i64,
        /// Why it was rejected
        reason: &'static str,
    },

    /// No product has the given identifier.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// A product with the same identifier is already in the catalog.
    #[error("Duplicate product id: {0}")]
    DuplicateProductId(String),

    /// A product name was empty or whitespace only.
    #[error("Product name must not be empty (product {0})")]
    EmptyName(String),
}

impl InventoryError {
    /// Shorthand for a negative-value rejection.
    pub(crate) fn negative(field: &'static str, value: i64) -> Self {
        Self::InvalidValue {
            field,
            value,
            reason: "must not be negative",
        }
    }
}
