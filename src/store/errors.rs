//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a document store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("duplicate key on '{field}': {value}")]
    DuplicateKey { field: String, value: String },

    /// The store cannot serve requests
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn duplicate_key(field: impl Into<String>, value: impl ToString) -> Self {
        StoreError::DuplicateKey {
            field: field.into(),
            value: value.to_string(),
        }
    }
}
