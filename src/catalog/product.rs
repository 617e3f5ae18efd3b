//! Product records.
//!
//! Fields are private: identity never changes after construction, and
//! stock, price, category and name change only through the ledger, which
//! enforces the non-negative invariants.

use std::borrow::Borrow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Unique, immutable product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    /// Minor currency units
    unit_price: u64,
    quantity: u32,
    expiry_date: NaiveDate,
    supplier: String,
    category: Option<String>,
}

impl Product {
    /// Create a product.
    ///
    /// # Errors
    ///
    /// [`InventoryError::EmptyName`] if `name` is empty or whitespace only.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: u64,
        quantity: u32,
        expiry_date: NaiveDate,
        supplier: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        let id = id.into();
        let name = name.into();
        validate_name(&id, &name)?;

        Ok(Self {
            id,
            name,
            unit_price,
            quantity,
            expiry_date,
            supplier: supplier.into(),
            category: None,
        })
    }

    /// Set the category at construction time. Blank categories are stored as none.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price in minor currency units.
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Units on hand.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether fewer than `threshold` units are on hand.
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.quantity < threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Value of the units on hand in minor currency units, saturating.
    pub fn stock_value(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_unit_price(&mut self, unit_price: u64) {
        self.unit_price = unit_price;
    }

    pub(crate) fn set_category(&mut self, category: Option<String>) {
        self.category = category.and_then(non_blank);
    }

    pub(crate) fn set_name(&mut self, name: String) -> Result<(), InventoryError> {
        validate_name(&self.id, &name)?;
        self.name = name;
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product({}, {})", self.id, self.name)
    }
}

fn validate_name(id: &ProductId, name: &str) -> Result<(), InventoryError> {
    if name.trim().is_empty() {
        return Err(InventoryError::EmptyName(id.to_string()));
    }
    Ok(())
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_new_product() {
        let product = Product::new("P001", "Rice 5kg", 1500, 50, date(), "Agro Ltd")
            .unwrap()
            .with_category("Grains");

        assert_eq!(product.id().as_str(), "P001");
        assert_eq!(product.name(), "Rice 5kg");
        assert_eq!(product.unit_price(), 1500);
        assert_eq!(product.quantity(), 50);
        assert_eq!(product.category(), Some("Grains"));
        assert_eq!(product.stock_value(), 75_000);
        assert_eq!(product.to_string(), "Product(P001, Rice 5kg)");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let err = Product::new("P002", "   ", 100, 1, date(), "x").unwrap_err();
        assert_eq!(err, InventoryError::EmptyName("P002".to_string()));
    }

    #[test]
    fn test_blank_category_is_none() {
        let product = Product::new("P003", "Salt", 100, 1, date(), "x")
            .unwrap()
            .with_category("");
        assert_eq!(product.category(), None);
    }

    #[test]
    fn test_stock_flags() {
        let mut product = Product::new("P004", "Oil", 100, 10, date(), "x").unwrap();
        assert!(product.is_low_stock(30));
        assert!(!product.is_low_stock(10));
        assert!(!product.is_out_of_stock());

        product.set_quantity(0);
        assert!(product.is_out_of_stock());
        assert_eq!(product.stock_value(), 0);
    }

    #[test]
    fn test_product_id_borrows_as_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(ProductId::new("P9"), 1);
        assert_eq!(map.get("P9"), Some(&1));
    }
}
