use thiserror::Error;

/// Errors reported by a document store backend.
///
/// These describe transport or service-level failures and are passed through
/// to callers unmodified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Conditional check failed")]
    ConditionFailed,
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Request rejected: {0}")]
    Validation(String),
    #[error("Service error: {0}")]
    Service(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
