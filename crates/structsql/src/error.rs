//! Error types for structsql

use std::time::Duration;
use thiserror::Error;

/// Result type alias for structsql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for building and executing statements
#[derive(Debug, Error)]
pub enum Error {
    /// Struct metadata could not be resolved into a table descriptor
    #[error("metadata error: {0}")]
    Metadata(String),

    /// A predicate referenced a field that is not part of the table
    #[error("unknown column: no field named '{0}' on this table")]
    Column(String),

    /// Insert was built with zero row values
    #[error("insert requires at least one row of values")]
    NoValues,

    /// Select expected a row, none matched
    #[error("not found: {0}")]
    NotFound(String),

    /// Row value incompatible with the destination field type
    #[error("decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Driver-level failure; the original diagnostic text is preserved
    #[error("execution error: {0}")]
    Execution(#[from] tokio_postgres::Error),

    /// The operation's deadline elapsed before it completed
    #[error("deadline exceeded after {0:?}")]
    Timeout(Duration),

    /// Database connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("pool error: {0}")]
    Pool(String),
}

impl Error {
    /// Create a metadata error
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a deadline error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
