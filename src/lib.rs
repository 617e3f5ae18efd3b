//! Stockroom Library
//!
//! Product name search and stock keeping for a small shop inventory. The
//! library is used by the `stockroom` binary, but can also be embedded by
//! point-of-sale front ends.
//!
//! # Architecture
//!
//! - [`data_structures`]: a Bloom filter and a character trie, both
//!   case-insensitive
//! - [`catalog`]: the product collection and its name search index
//! - [`ledger`]: validated stock, price and field changes
//! - [`sale`]: carts and checkout
//! - [`storage`]: the JSON stock file
//! - [`config`] and [`error`]: layered settings and the error taxonomy

pub mod catalog;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod ledger;
pub mod sale;
pub mod storage;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

use std::sync::Arc;

use catalog::Catalog;
use config::StockroomConfig;
use error::StockroomResult;
use storage::JsonStockFile;

/// Version information for Stockroom.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function
pub fn init() {
    error::set_error_reporter(Arc::new(error::TracingErrorReporter));
}

/// Load the configured stock file into an indexed catalog.
///
/// Returns the store alongside so callers can save changes back.
pub fn open_catalog(config: &StockroomConfig) -> StockroomResult<(Catalog, JsonStockFile)> {
    let store = JsonStockFile::new(&config.inventory.data_file);
    let products = store.load()?;
    let catalog = Catalog::from_products(products, config)?;
    Ok((catalog, store))
}
