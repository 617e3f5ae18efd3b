//! Catalog shared between threads.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Catalog, Product};
use crate::error::InventoryError;
use crate::ledger::ProductUpdate;

/// A [`Catalog`] behind one lock.
///
/// Each method holds the lock for the whole logical operation, so a
/// stock check and the decrement that follows it can never interleave with
/// another session's sale.
#[derive(Debug, Clone)]
pub struct SharedCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Sell `quantity` units of a product.
    pub fn sell(&self, id: &str, quantity: i64) -> Result<u32, InventoryError> {
        self.inner.lock().sell(id, quantity)
    }

    /// Receive `quantity` units of a product.
    pub fn restock(&self, id: &str, quantity: i64) -> Result<u32, InventoryError> {
        self.inner.lock().restock(id, quantity)
    }

    pub fn apply_update(&self, id: &str, update: ProductUpdate) -> Result<(), InventoryError> {
        self.inner.lock().apply_update(id, update)
    }

    /// Snapshot of the products matching `term`.
    pub fn search(&self, term: &str) -> Vec<Product> {
        self.inner.lock().search(term).into_iter().cloned().collect()
    }

    /// Snapshot of one product.
    pub fn get(&self, id: &str) -> Result<Product, InventoryError> {
        self.inner.lock().get(id).cloned()
    }

    /// Run `f` with shared access to the catalog while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run `f` with exclusive access to the catalog while holding the lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StockroomConfig;
    use chrono::NaiveDate;
    use std::thread;

    #[test]
    fn test_concurrent_sales_never_oversell() {
        let expiry = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let product = Product::new("P1", "Sugar 1kg", 400, 100, expiry, "Mill").unwrap();
        let catalog = Catalog::from_products(vec![product], &StockroomConfig::default()).unwrap();
        let shared = SharedCatalog::new(catalog);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || (0..20).filter(|_| shared.sell("P1", 1).is_ok()).count())
            })
            .collect();

        let sold: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(sold, 100);
        assert_eq!(shared.get("P1").unwrap().quantity(), 0);
        assert_eq!(shared.search("sugar").len(), 1);
    }

    #[test]
    fn test_write_closure_runs_under_lock() {
        let shared = SharedCatalog::new(Catalog::new(&StockroomConfig::default()).unwrap());
        let expiry = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

        shared
            .write(|catalog| catalog.add(Product::new("P1", "Tea", 250, 3, expiry, "Estate")?))
            .unwrap();
        assert_eq!(shared.read(|catalog| catalog.len()), 1);
    }
}
