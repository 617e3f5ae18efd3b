//! Product catalog.
//!
//! [`Catalog`] is the single owner of every [`Product`]. Reads borrow it
//! shared; stock and field changes borrow it exclusively and go through the
//! [`StockLedger`]. The name index is kept in step with the product list:
//! adding a product indexes it, and renaming or removing one rebuilds the
//! index from the remaining products.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use stockroom_lib::catalog::{Catalog, Product};
//! use stockroom_lib::config::StockroomConfig;
//!
//! let expiry = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
//! let mut catalog = Catalog::new(&StockroomConfig::default()).unwrap();
//! catalog
//!     .add(Product::new("P001", "Rice 5kg", 1500, 50, expiry, "Agro Ltd").unwrap())
//!     .unwrap();
//!
//! assert_eq!(catalog.search("RICE").len(), 1);
//! assert_eq!(catalog.sell("P001", 5).unwrap(), 45);
//! ```

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::{debug, info};

pub mod index;
pub mod product;
pub mod shared;

pub use index::CatalogIndex;
pub use product::{Product, ProductId};
pub use shared::SharedCatalog;

use crate::config::StockroomConfig;
use crate::data_structures::normalize_key;
use crate::error::{InventoryError, StockroomResult};
use crate::ledger::{ProductUpdate, StockLedger};

/// Orderings for inventory listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Soonest expiry first
    #[default]
    Expiry,
    /// Alphabetical, case-insensitive
    Name,
    /// Fewest units first
    Stock,
    /// Highest unit price first
    Price,
}

/// The authoritative in-memory product collection.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
    positions: HashMap<ProductId, usize>,
    index: CatalogIndex,
    low_stock_threshold: u32,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new(config: &StockroomConfig) -> StockroomResult<Self> {
        Ok(Self {
            products: Vec::new(),
            positions: HashMap::new(),
            index: CatalogIndex::new(&config.index)?,
            low_stock_threshold: config.inventory.low_stock_threshold,
        })
    }

    /// Create a catalog from a bulk-loaded product list and index it once.
    ///
    /// # Errors
    ///
    /// [`InventoryError::DuplicateProductId`] if two products share an id.
    pub fn from_products(products: Vec<Product>, config: &StockroomConfig) -> StockroomResult<Self> {
        let mut catalog = Self::new(config)?;

        for (position, product) in products.iter().enumerate() {
            if catalog
                .positions
                .insert(product.id().clone(), position)
                .is_some()
            {
                return Err(InventoryError::DuplicateProductId(product.id().to_string()).into());
            }
        }
        catalog.products = products;
        catalog.index.rebuild(&catalog.products);

        info!(products = catalog.products.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Add a product and index its name.
    pub fn add(&mut self, product: Product) -> Result<(), InventoryError> {
        if self.positions.contains_key(product.id()) {
            return Err(InventoryError::DuplicateProductId(product.id().to_string()));
        }

        self.index.add(&product);
        self.positions.insert(product.id().clone(), self.products.len());
        debug!(product_id = %product.id(), "Product added");
        self.products.push(product);
        Ok(())
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Result<&Product, InventoryError> {
        self.positions
            .get(id)
            .map(|&position| &self.products[position])
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))
    }

    /// Products whose name starts with `term`, case-insensitively, in name order.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        self.index
            .search(term)
            .into_iter()
            .filter_map(|id| {
                let product = self.get(id.as_str()).ok();
                debug_assert!(product.is_some(), "index refers to unknown product {id}");
                product
            })
            .collect()
    }

    /// The product with exactly this name, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        let id = self.index.lookup_name(name)?;
        self.get(id.as_str()).ok()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.index.contains_name(name)
    }

    /// All products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    /// All products ordered by `key`. Ties keep insertion order.
    pub fn sorted_by(&self, key: SortKey) -> Vec<&Product> {
        let mut sorted: Vec<&Product> = self.products.iter().collect();
        match key {
            SortKey::Expiry => sorted.sort_by_key(|p| p.expiry_date()),
            SortKey::Name => sorted.sort_by_cached_key(|p| normalize_key(p.name())),
            SortKey::Stock => sorted.sort_by_key(|p| p.quantity()),
            SortKey::Price => sorted.sort_by_key(|p| Reverse(p.unit_price())),
        }
        sorted
    }

    /// Products below the low-stock threshold, fewest units first.
    pub fn low_stock(&self) -> Vec<&Product> {
        let mut low: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.is_low_stock(self.low_stock_threshold))
            .collect();
        low.sort_by_key(|p| p.quantity());
        low
    }

    pub fn out_of_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_out_of_stock()).collect()
    }

    /// Products whose name, category or id contains `term`, ignoring case.
    ///
    /// Unlike [`Catalog::search`] this is a substring scan over the product
    /// list, not a prefix lookup in the index. A blank term keeps every
    /// product. Catalog order is kept.
    pub fn filter(&self, term: &str) -> Vec<&Product> {
        let needle = normalize_key(term.trim());
        if needle.is_empty() {
            return self.products.iter().collect();
        }

        self.products
            .iter()
            .filter(|p| {
                normalize_key(p.name()).contains(&needle)
                    || p.category().is_some_and(|c| normalize_key(c).contains(&needle))
                    || normalize_key(p.id().as_str()).contains(&needle)
            })
            .collect()
    }

    /// Value of all units on hand in minor currency units, saturating.
    pub fn stock_value(&self) -> u64 {
        self.products
            .iter()
            .fold(0u64, |sum, p| sum.saturating_add(p.stock_value()))
    }

    /// Sell `quantity` units of a product. Returns the new quantity on hand.
    pub fn sell(&mut self, id: &str, quantity: i64) -> Result<u32, InventoryError> {
        StockLedger::sell(self.product_mut(id)?, quantity)
    }

    /// Receive `quantity` units of a product. Returns the new quantity on hand.
    pub fn restock(&mut self, id: &str, quantity: i64) -> Result<u32, InventoryError> {
        StockLedger::restock(self.product_mut(id)?, quantity)
    }

    /// Apply an administrative update, reindexing after a rename.
    pub fn apply_update(&mut self, id: &str, update: ProductUpdate) -> Result<(), InventoryError> {
        let renames = matches!(update, ProductUpdate::SetName(_));
        StockLedger::apply(self.product_mut(id)?, update)?;
        if renames {
            self.index.rebuild(&self.products);
        }
        Ok(())
    }

    /// Remove a product and rebuild the index without it.
    pub fn remove(&mut self, id: &str) -> Result<Product, InventoryError> {
        let position = self
            .positions
            .remove(id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;

        let product = self.products.remove(position);
        for slot in self.positions.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        self.index.rebuild(&self.products);

        debug!(product_id = %product.id(), "Product removed");
        Ok(product)
    }

    /// Rebuild the name index from the current products.
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(&self.products);
    }

    fn product_mut(&mut self, id: &str) -> Result<&mut Product, InventoryError> {
        match self.positions.get(id) {
            Some(&position) => Ok(&mut self.products[position]),
            None => Err(InventoryError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StockroomError;
    use chrono::NaiveDate;

    fn product(id: &str, name: &str, price: u64, quantity: u32, day: u32) -> Product {
        let expiry = NaiveDate::from_ymd_opt(2026, 5, day).unwrap();
        Product::new(id, name, price, quantity, expiry, "Supplier").unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::from_products(
            vec![
                product("P1", "Rice 5kg", 1500, 50, 20),
                product("P2", "Rice 10kg", 2800, 0, 10),
                product("P3", "beans", 900, 12, 15),
            ],
            &StockroomConfig::default(),
        )
        .unwrap()
    }

    fn ids(products: Vec<&Product>) -> Vec<&str> {
        products.into_iter().map(|p| p.id().as_str()).collect()
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Catalog::from_products(
            vec![product("P1", "A", 1, 1, 1), product("P1", "B", 1, 1, 1)],
            &StockroomConfig::default(),
        );
        assert!(matches!(
            result,
            Err(StockroomError::Inventory(InventoryError::DuplicateProductId(_)))
        ));

        let mut catalog = catalog();
        let err = catalog.add(product("P2", "Other", 1, 1, 1)).unwrap_err();
        assert_eq!(err, InventoryError::DuplicateProductId("P2".to_string()));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let catalog = catalog();
        assert_eq!(
            catalog.get("P404").unwrap_err(),
            InventoryError::NotFound("P404".to_string())
        );
    }

    #[test]
    fn test_search_resolves_products() {
        let catalog = catalog();
        assert_eq!(ids(catalog.search("ric")), vec!["P2", "P1"]);
        assert_eq!(ids(catalog.search("BEAN")), vec!["P3"]);
        assert!(catalog.search("flour").is_empty());
        assert_eq!(catalog.find_by_name("rice 5KG").map(|p| p.id().as_str()), Some("P1"));
    }

    #[test]
    fn test_sorted_views() {
        let catalog = catalog();
        assert_eq!(ids(catalog.sorted_by(SortKey::Expiry)), vec!["P2", "P3", "P1"]);
        assert_eq!(ids(catalog.sorted_by(SortKey::Name)), vec!["P3", "P2", "P1"]);
        assert_eq!(ids(catalog.sorted_by(SortKey::Stock)), vec!["P2", "P3", "P1"]);
        assert_eq!(ids(catalog.sorted_by(SortKey::Price)), vec!["P2", "P1", "P3"]);
    }

    #[test]
    fn test_stock_views() {
        let catalog = catalog();
        assert_eq!(ids(catalog.low_stock()), vec!["P2", "P3"]);
        assert_eq!(ids(catalog.out_of_stock()), vec!["P2"]);
    }

    #[test]
    fn test_filter_matches_name_category_and_id() {
        let mut products = catalog().products().to_vec();
        products.push(product("X9", "Palm oil", 2000, 4, 1).with_category("Cooking"));
        let catalog = Catalog::from_products(products, &StockroomConfig::default()).unwrap();

        assert_eq!(ids(catalog.filter("KG")), vec!["P1", "P2"]);
        assert_eq!(ids(catalog.filter("cook")), vec!["X9"]);
        assert_eq!(ids(catalog.filter("x9")), vec!["X9"]);
        assert_eq!(ids(catalog.filter("0k")), vec!["P2"]);
        assert_eq!(ids(catalog.filter("  ")).len(), 4);
        assert!(catalog.filter("flour").is_empty());
    }

    #[test]
    fn test_stock_value() {
        let catalog = catalog();
        assert_eq!(catalog.stock_value(), 50 * 1500 + 12 * 900);
    }

    #[test]
    fn test_sell_unknown_product() {
        let mut catalog = catalog();
        assert_eq!(
            catalog.sell("P404", 1).unwrap_err(),
            InventoryError::NotFound("P404".to_string())
        );
    }

    #[test]
    fn test_rename_reindexes() {
        let mut catalog = catalog();
        catalog
            .apply_update("P3", ProductUpdate::SetName("Black Beans".to_string()))
            .unwrap();

        assert!(catalog.search("beans").is_empty());
        assert_eq!(ids(catalog.search("black")), vec!["P3"]);
    }

    #[test]
    fn test_remove_keeps_positions_consistent() {
        let mut catalog = catalog();
        let removed = catalog.remove("P1").unwrap();
        assert_eq!(removed.id().as_str(), "P1");

        assert_eq!(ids(catalog.search("rice")), vec!["P2"]);
        assert_eq!(catalog.get("P3").unwrap().name(), "beans");
        assert_eq!(catalog.sell("P3", 2), Ok(10));
        assert!(catalog.remove("P1").is_err());
    }
}
