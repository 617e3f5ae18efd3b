//! Stock ledger.
//!
//! Every change to a product's stock, price, category or name goes through
//! [`StockLedger`]. Inputs arrive as signed integers, the way they come from
//! a form or a command line, and are checked before anything is written: a
//! rejected operation leaves the product exactly as it was.

use tracing::debug;

use crate::catalog::Product;
use crate::error::InventoryError;

/// A single administrative update to one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductUpdate {
    /// Set the units on hand
    SetQuantity(i64),
    /// Set the unit price in minor currency units
    SetPrice(i64),
    /// Set or clear the category
    SetCategory(Option<String>),
    /// Rename the product; the catalog reindexes afterwards
    SetName(String),
}

/// Validated mutations of a single product.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockLedger;

impl StockLedger {
    /// Remove `quantity` units from stock.
    ///
    /// Returns the new quantity on hand.
    ///
    /// # Errors
    ///
    /// * [`InventoryError::InvalidValue`] if `quantity` is zero or negative
    /// * [`InventoryError::InsufficientStock`] if `quantity` exceeds the units on hand
    pub fn sell(product: &mut Product, quantity: i64) -> Result<u32, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidValue {
                field: "quantity",
                value: quantity,
                reason: "sale quantity must be positive",
            });
        }

        let available = product.quantity();
        let remaining = u32::try_from(quantity)
            .ok()
            .and_then(|requested| available.checked_sub(requested))
            .ok_or_else(|| InventoryError::InsufficientStock {
                product_id: product.id().to_string(),
                available,
                requested: quantity,
            })?;

        product.set_quantity(remaining);
        debug!(product_id = %product.id(), sold = quantity, remaining, "Stock sold");
        Ok(remaining)
    }

    /// Add `quantity` units to stock.
    ///
    /// Returns the new quantity on hand.
    pub fn restock(product: &mut Product, quantity: i64) -> Result<u32, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidValue {
                field: "quantity",
                value: quantity,
                reason: "restock quantity must be positive",
            });
        }

        let updated = u32::try_from(quantity)
            .ok()
            .and_then(|added| product.quantity().checked_add(added))
            .ok_or(InventoryError::InvalidValue {
                field: "quantity",
                value: quantity,
                reason: "stock would exceed the maximum",
            })?;

        product.set_quantity(updated);
        debug!(product_id = %product.id(), added = quantity, updated, "Stock received");
        Ok(updated)
    }

    /// Set the units on hand to an absolute value.
    pub fn update_quantity(product: &mut Product, quantity: i64) -> Result<(), InventoryError> {
        if quantity < 0 {
            return Err(InventoryError::negative("quantity", quantity));
        }
        let quantity = u32::try_from(quantity).map_err(|_| InventoryError::InvalidValue {
            field: "quantity",
            value: quantity,
            reason: "exceeds the maximum stock",
        })?;

        product.set_quantity(quantity);
        debug!(product_id = %product.id(), quantity, "Quantity set");
        Ok(())
    }

    /// Set the unit price, in minor currency units.
    pub fn update_price(product: &mut Product, price: i64) -> Result<(), InventoryError> {
        let unit_price = u64::try_from(price).map_err(|_| InventoryError::negative("price", price))?;

        product.set_unit_price(unit_price);
        debug!(product_id = %product.id(), unit_price, "Price set");
        Ok(())
    }

    /// Apply one [`ProductUpdate`].
    pub fn apply(product: &mut Product, update: ProductUpdate) -> Result<(), InventoryError> {
        match update {
            ProductUpdate::SetQuantity(quantity) => Self::update_quantity(product, quantity),
            ProductUpdate::SetPrice(price) => Self::update_price(product, price),
            ProductUpdate::SetCategory(category) => {
                product.set_category(category);
                debug!(product_id = %product.id(), category = ?product.category(), "Category set");
                Ok(())
            }
            ProductUpdate::SetName(name) => {
                product.set_name(name)?;
                debug!(product_id = %product.id(), name = %product.name(), "Product renamed");
                Ok(())
            }
        }
    }
}
