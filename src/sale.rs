//! Cart checkout.
//!
//! A [`Cart`] collects (product, quantity) lines. [`checkout`] checks every
//! line against current stock before touching anything, sells each line
//! through the ledger, and then saves the inventory through an
//! [`InventoryStore`]. A failed save after stock has been decremented is
//! reported and returned as [`SaleError::NotPersisted`].

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{error, info};

use crate::catalog::{Catalog, Product, ProductId};
use crate::error::{
    report_error, ErrorContext, InventoryError, SaleError, StockroomError, StorageError,
};

/// Persistence for the full product list.
#[cfg_attr(test, mockall::automock)]
pub trait InventoryStore {
    /// Replace the stored products with `products`.
    fn save(&self, products: &[Product]) -> Result<(), StorageError>;
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Products chosen for one sale. Each product appears on at most one line.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// * [`InventoryError::NotFound`] if the product is not in the catalog
    /// * [`InventoryError::InvalidValue`] if `quantity` is zero or negative
    /// * [`InventoryError::InsufficientStock`] if the cart would hold more
    ///   units than are on hand
    pub fn add(&mut self, catalog: &Catalog, id: &str, quantity: i64) -> Result<(), InventoryError> {
        let product = catalog.get(id)?;
        if quantity <= 0 {
            return Err(InventoryError::InvalidValue {
                field: "quantity",
                value: quantity,
                reason: "cart quantity must be positive",
            });
        }

        let available = product.quantity();
        let requested = i64::from(self.quantity_of(id)).saturating_add(quantity);
        let wanted = u32::try_from(requested)
            .ok()
            .filter(|&wanted| wanted <= available)
            .ok_or_else(|| InventoryError::InsufficientStock {
                product_id: id.to_string(),
                available,
                requested,
            })?;

        match self.lines.iter_mut().find(|line| line.product_id.as_str() == id) {
            Some(line) => line.quantity = wanted,
            None => self.lines.push(CartLine {
                product_id: product.id().clone(),
                quantity: wanted,
            }),
        }
        Ok(())
    }

    /// Drop the line for a product. Returns whether there was one.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id.as_str() != id);
        self.lines.len() != before
    }

    /// Units of a product already in the cart.
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id.as_str() == id)
            .map_or(0, |line| line.quantity)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// One sold line. Amounts are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub line_total: u64,
}

/// Receipt for a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRecord {
    /// Who bought
    pub customer: String,
    /// Who rang the sale up
    pub cashier: String,
    pub sold_at: DateTime<Local>,
    pub lines: Vec<SaleLine>,
    pub total: u64,
}

/// Sell every line of `cart` to `customer` and save the inventory.
///
/// Either every line is sold or none is: all lines are checked against
/// current stock first.
///
/// # Errors
///
/// * [`SaleError::BlankName`] if `customer` or `cashier` is blank
/// * [`SaleError::EmptyCart`] if the cart has no lines
/// * [`SaleError::Rejected`] if a line no longer fits the stock on hand
/// * [`SaleError::NotPersisted`] if stock was sold but the save failed
pub fn checkout(
    catalog: &mut Catalog,
    cart: &Cart,
    customer: &str,
    cashier: &str,
    store: &dyn InventoryStore,
) -> Result<SaleRecord, SaleError> {
    if customer.trim().is_empty() {
        return Err(SaleError::BlankName { role: "customer" });
    }
    if cashier.trim().is_empty() {
        return Err(SaleError::BlankName { role: "cashier" });
    }
    if cart.is_empty() {
        return Err(SaleError::EmptyCart);
    }

    for line in cart.lines() {
        let product = catalog.get(line.product_id.as_str())?;
        if line.quantity > product.quantity() {
            return Err(InventoryError::InsufficientStock {
                product_id: line.product_id.to_string(),
                available: product.quantity(),
                requested: i64::from(line.quantity),
            }
            .into());
        }
    }

    let mut lines = Vec::with_capacity(cart.len());
    for line in cart.lines() {
        let id = line.product_id.as_str();
        catalog.sell(id, i64::from(line.quantity))?;

        let product = catalog.get(id)?;
        lines.push(SaleLine {
            product_id: line.product_id.clone(),
            name: product.name().to_string(),
            quantity: line.quantity,
            unit_price: product.unit_price(),
            line_total: product.unit_price().saturating_mul(u64::from(line.quantity)),
        });
    }

    let total = lines
        .iter()
        .fold(0u64, |sum, line| sum.saturating_add(line.line_total));
    let record = SaleRecord {
        customer: customer.trim().to_string(),
        cashier: cashier.trim().to_string(),
        sold_at: Local::now(),
        lines,
        total,
    };

    if let Err(source) = store.save(catalog.products()) {
        error!(error = %source, total = record.total, "Sale completed but inventory was not saved");
        report_error(
            ErrorContext::new(
                StockroomError::Custom(format!("Inventory not saved after sale: {source}")),
                "checkout",
            )
            .with_details(format!(
                "{} line(s) sold to {} by {} at {}, total {}; in-memory stock differs from the stock file",
                record.lines.len(),
                record.customer,
                record.cashier,
                record.sold_at.format("%Y-%m-%d %H:%M:%S"),
                record.total
            )),
        );
        return Err(SaleError::NotPersisted {
            record: Box::new(record),
            source,
        });
    }

    info!(
        customer = %record.customer,
        cashier = %record.cashier,
        lines = record.lines.len(),
        total = record.total,
        "Sale completed"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StockroomConfig;
    use chrono::NaiveDate;
    use std::io;
    use test_case::test_case;

    fn catalog() -> Catalog {
        let expiry = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();
        Catalog::from_products(
            vec![
                Product::new("P1", "Rice 5kg", 1500, 10, expiry, "Agro").unwrap(),
                Product::new("P2", "Beans", 900, 2, expiry, "Agro").unwrap(),
            ],
            &StockroomConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_cart_merges_lines() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "P1", 3).unwrap();
        cart.add(&catalog, "P1", 4).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of("P1"), 7);

        let err = cart.add(&catalog, "P1", 4).unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientStock { requested: 11, .. }));
        assert_eq!(cart.quantity_of("P1"), 7);
    }

    #[test]
    fn test_cart_rejects_bad_lines() {
        let catalog = catalog();
        let mut cart = Cart::new();

        assert!(matches!(
            cart.add(&catalog, "P9", 1),
            Err(InventoryError::NotFound(_))
        ));
        assert!(matches!(
            cart.add(&catalog, "P1", 0),
            Err(InventoryError::InvalidValue { .. })
        ));
        assert!(matches!(
            cart.add(&catalog, "P1", -2),
            Err(InventoryError::InvalidValue { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test_case(11 ; "one over stock")]
    #[test_case(5_000_000_000 ; "beyond u32")]
    #[test_case(i64::MAX ; "i64 max")]
    fn test_cart_request_above_stock(quantity: i64) {
        let catalog = catalog();
        let mut cart = Cart::new();

        let err = cart.add(&catalog, "P1", quantity).unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                product_id: "P1".to_string(),
                available: 10,
                requested: quantity,
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_request_saturates_on_merge() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "P1", 3).unwrap();

        let err = cart.add(&catalog, "P1", i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientStock { requested: i64::MAX, .. }
        ));
        assert_eq!(cart.quantity_of("P1"), 3);
    }

    #[test]
    fn test_checkout_sells_and_saves() {
        let mut catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "P1", 2).unwrap();
        cart.add(&catalog, "P2", 2).unwrap();

        let mut store = MockInventoryStore::new();
        store
            .expect_save()
            .withf(|products| products.iter().map(|p| p.quantity()).eq([8, 0]))
            .times(1)
            .returning(|_| Ok(()));

        let before = Local::now();
        let record = checkout(&mut catalog, &cart, " Ama ", "Kofi", &store).unwrap();
        assert_eq!(record.customer, "Ama");
        assert_eq!(record.cashier, "Kofi");
        assert!(record.sold_at >= before);
        assert_eq!(record.total, 2 * 1500 + 2 * 900);
        assert_eq!(record.lines[0].line_total, 3000);
        assert_eq!(record.lines[1].name, "Beans");
    }

    #[test_case("", "Kofi", "customer" ; "empty customer")]
    #[test_case("   ", "Kofi", "customer" ; "blank customer")]
    #[test_case("Ama", "", "cashier" ; "empty cashier")]
    fn test_checkout_requires_names(customer: &str, cashier: &str, role: &str) {
        let mut catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "P1", 1).unwrap();

        let mut store = MockInventoryStore::new();
        store.expect_save().times(0);

        match checkout(&mut catalog, &cart, customer, cashier, &store) {
            Err(SaleError::BlankName { role: blank }) => assert_eq!(blank, role),
            other => panic!("expected BlankName, got {other:?}"),
        }
        assert_eq!(catalog.get("P1").unwrap().quantity(), 10);
    }

    #[test]
    fn test_customer_is_checked_before_cart() {
        let mut catalog = catalog();
        let store = MockInventoryStore::new();
        assert!(matches!(
            checkout(&mut catalog, &Cart::new(), "", "Kofi", &store),
            Err(SaleError::BlankName { role: "customer" })
        ));
    }

    #[test]
    fn test_record_serializes_to_json() {
        let mut catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "P2", 1).unwrap();

        let mut store = MockInventoryStore::new();
        store.expect_save().returning(|_| Ok(()));

        let record = checkout(&mut catalog, &cart, "Ama", "Kofi", &store).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["customer"], "Ama");
        assert_eq!(json["cashier"], "Kofi");
        assert_eq!(json["total"], 900);
        assert_eq!(json["lines"][0]["product_id"], "P2");
        assert_eq!(json["lines"][0]["unit_price"], 900);
        assert!(json["sold_at"].is_string());
    }

    #[test]
    fn test_checkout_is_all_or_nothing() {
        let mut catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "P1", 5).unwrap();
        cart.add(&catalog, "P2", 2).unwrap();
        catalog.sell("P2", 1).unwrap();

        let mut store = MockInventoryStore::new();
        store.expect_save().times(0);

        let err = checkout(&mut catalog, &cart, "Ama", "Kofi", &store).unwrap_err();
        assert!(matches!(
            err,
            SaleError::Rejected(InventoryError::InsufficientStock { available: 1, .. })
        ));
        assert_eq!(catalog.get("P1").unwrap().quantity(), 10);
    }

    #[test]
    fn test_empty_cart() {
        let mut catalog = catalog();
        let store = MockInventoryStore::new();
        assert!(matches!(
            checkout(&mut catalog, &Cart::new(), "Ama", "Kofi", &store),
            Err(SaleError::EmptyCart)
        ));
    }

    #[test]
    fn test_failed_save_is_surfaced() {
        let mut catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "P1", 1).unwrap();

        let mut store = MockInventoryStore::new();
        store
            .expect_save()
            .returning(|_| Err(StorageError::Io(io::Error::new(io::ErrorKind::Other, "disk full"))));

        match checkout(&mut catalog, &cart, "Ama", "Kofi", &store) {
            Err(SaleError::NotPersisted { record, .. }) => assert_eq!(record.total, 1500),
            other => panic!("expected NotPersisted, got {other:?}"),
        }
        assert_eq!(catalog.get("P1").unwrap().quantity(), 9);
    }
}
