//! Error module for Stockroom.
//!
//! This module provides the error handling framework for the whole crate:
//! one `thiserror` enum per concern, aggregated into [`StockroomError`], and
//! an error reporting channel for failures that must be surfaced even when
//! the caller carries on (such as a sale that could not be saved).

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use thiserror::Error;

pub mod config;
pub mod inventory;
pub mod sale;
pub mod storage;

pub use config::ConfigError;
pub use inventory::InventoryError;
pub use sale::SaleError;
pub use storage::StorageError;

use crate::data_structures::MembershipFilterError;

/// Result type alias used throughout Stockroom.
pub type StockroomResult<T> = Result<T, StockroomError>;

/// Core error enum for Stockroom.
#[derive(Error, Debug)]
pub enum StockroomError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog and ledger rule violations.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Stock file load and save failures.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout failures.
    #[error("Sale error: {0}")]
    Sale(#[from] SaleError),

    /// The search index could not be built.
    #[error("Index error: {0}")]
    Index(#[from] MembershipFilterError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: StockroomError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<E: Into<StockroomError>, S: Into<String>>(error: E, component: S) -> Self {
        Self {
            error: error.into(),
            component: component.into(),
            details: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: &ErrorContext);
}

/// An error reporter that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: &ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// Process-wide error reporter slot.
static ERROR_REPORTER: Lazy<RwLock<Arc<dyn ErrorReporter>>> = Lazy::new(|| {
    let reporter: Arc<dyn ErrorReporter> = Arc::new(TracingErrorReporter);
    RwLock::new(reporter)
});

/// Set the global error reporter.
///
/// # Arguments
///
/// * `reporter` - The error reporter to use
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) {
    *ERROR_REPORTER.write() = reporter;
}

/// Report an error through the global error reporter.
///
/// Reporting goes to tracing until another reporter is installed.
pub fn report_error(context: ErrorContext) {
    let reporter = Arc::clone(&ERROR_REPORTER.read());
    reporter.report(&context);
}
