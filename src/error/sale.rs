//! Sale error module.
//!
//! This module defines errors raised by the checkout workflow.

use thiserror::Error;

use super::inventory::InventoryError;
use super::storage::StorageError;
use crate::sale::SaleRecord;

/// Errors that can occur while checking out a cart.
#[derive(Error, Debug)]
pub enum SaleError {
    /// The customer or cashier name is blank.
    #[error("{role} name must not be empty")]
    BlankName {
        /// Which party was left blank
        role: &'static str,
    },

    /// Checkout was attempted with no lines in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A line could not be sold; no stock was changed.
    #[error("Sale rejected: {0}")]
    Rejected(#[from] InventoryError),

    /// Stock was decremented but saving the inventory failed.
    ///
    /// The in-memory catalog and the stock file now disagree. The record of
    /// what was sold is carried so the caller can retry the save or reconcile.
    #[error("Sale completed but inventory was not saved: {source}")]
    NotPersisted {
        /// What was sold
        record: Box<SaleRecord>,
        /// Why the save failed
        source: StorageError,
    },
}
