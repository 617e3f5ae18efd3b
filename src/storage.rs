//! JSON stock file.
//!
//! The file looks like
//!
//! ```json
//! {
//!   "products": [
//!     {
//!       "product_id": "P001",
//!       "name": "Rice 5kg",
//!       "category": "Grains",
//!       "quantity_in_stock": 50,
//!       "unit_price": 1500,
//!       "expiry_date": "2026-03-01",
//!       "supplier": "Agro Ltd"
//!     }
//!   ],
//!   "metadata": { "total_products": 1, "last_updated": "2026-01-05 09:30:00" }
//! }
//! ```
//!
//! Saving rewrites `products` and the two metadata fields and leaves every
//! other key in the document as it was.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::catalog::Product;
use crate::error::{InventoryError, StorageError};
use crate::sale::InventoryStore;

/// Timestamp format for `metadata.last_updated`.
const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One product as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub quantity_in_stock: u32,
    pub unit_price: u64,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub supplier: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = InventoryError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Product::new(
            record.product_id,
            record.name,
            record.unit_price,
            record.quantity_in_stock,
            record.expiry_date,
            record.supplier,
        )?
        .with_category(record.category))
    }
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id().to_string(),
            name: product.name().to_string(),
            category: product.category().unwrap_or_default().to_string(),
            quantity_in_stock: product.quantity(),
            unit_price: product.unit_price(),
            expiry_date: product.expiry_date(),
            supplier: product.supplier().to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StockDocument {
    #[serde(default)]
    products: Vec<ProductRecord>,

    #[serde(default)]
    metadata: Map<String, Value>,

    #[serde(flatten)]
    other: Map<String, Value>,
}

/// A stock file on disk.
#[derive(Debug, Clone)]
pub struct JsonStockFile {
    path: PathBuf,
}

impl JsonStockFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every product from the file.
    ///
    /// # Errors
    ///
    /// * [`StorageError::FileNotFound`] if the file does not exist
    /// * [`StorageError::Malformed`] if it is not a stock document
    /// * [`StorageError::InvalidRecord`] if a product has an empty name
    pub fn load(&self) -> Result<Vec<Product>, StorageError> {
        let document = self.read_document()?;
        let products = document
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        info!(path = %self.path.display(), products = products.len(), "Stock file loaded");
        Ok(products)
    }

    /// Write `products` to the file, keeping unrelated keys.
    ///
    /// The document is written to a sibling temporary file first and then
    /// renamed over the original.
    pub fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(StorageError::FileNotFound(_)) => StockDocument::default(),
            Err(e) => return Err(e),
        };

        document.products = products.iter().map(ProductRecord::from).collect();
        document
            .metadata
            .insert("total_products".to_string(), Value::from(products.len()));
        document.metadata.insert(
            "last_updated".to_string(),
            Value::from(Local::now().format(LAST_UPDATED_FORMAT).to_string()),
        );

        let json = serde_json::to_string_pretty(&document)?;
        let staging = self.path.with_extension("json.tmp");
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;

        info!(path = %self.path.display(), products = products.len(), "Stock file saved");
        Ok(())
    }

    fn read_document(&self) -> Result<StockDocument, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::FileNotFound(self.path.clone()));
        }
        let text = fs::read_to_string(&self.path)?;
        let document = serde_json::from_str(&text)?;
        debug!(path = %self.path.display(), "Stock document parsed");
        Ok(document)
    }
}

impl InventoryStore for JsonStockFile {
    fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        JsonStockFile::save(self, products)
    }
}
