//! Candlestick Errors

use thiserror::Error;

/// Errors raised while normalizing provider price history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BarError {
    /// A required column is absent from the provider's schema.
    #[error("Schema mismatch: required column '{column}' is missing")]
    SchemaMismatch {
        /// Canonical (lowercase) name of the missing column.
        column: String,
    },
}

impl BarError {
    /// Create a schema mismatch for the given canonical column name.
    #[must_use]
    pub fn schema_mismatch(column: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            column: column.into(),
        }
    }
}
