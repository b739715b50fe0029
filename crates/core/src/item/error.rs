use thiserror::Error;

use crate::storage::StoreError;

/// Errors returned by item operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("Item not found in {table}: {id}")]
    NotFound { table: String, id: String },
    #[error("No values to update")]
    NoUpdateValues,
    #[error("Invalid continuation cursor: {0}")]
    InvalidCursor(String),
    #[error("Placeholder {0} is bound to conflicting values")]
    PlaceholderConflict(String),
    #[error("Invalid item: {0}")]
    InvalidItem(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ItemError {
    /// Creates a `NotFound` error for the given table and id.
    pub fn not_found(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
            id: id.into(),
        }
    }
}

/// Result type for item operations.
pub type Result<T> = std::result::Result<T, ItemError>;
