//! Storage error module.
//!
//! This module defines errors raised while loading or saving the JSON stock file.

use std::path::PathBuf;
use thiserror::Error;

use super::inventory::InventoryError;

/// Errors that can occur during stock file operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The stock file does not exist.
    #[error("Stock file not found: {0}")]
    FileNotFound(PathBuf),

    /// The stock file could not be read or written.
    #[error("Stock file IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stock file is not valid JSON or does not match the schema.
    #[error("Malformed stock file: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A record parsed but violates a product invariant.
    #[error("Invalid product record: {0}")]
    InvalidRecord(#[from] InventoryError),
}
