//! Error types for the SQLite store.

use thiserror::Error;

/// Errors surfaced by store operations.
///
/// Prepare and step failures carry the engine's own error message through
/// the wrapped [`rusqlite::Error`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The store was used after [`close`](crate::sqlite::SqliteStore::close).
    #[error("connection is closed")]
    Closed,

    /// A named parameter does not occur in the prepared statement.
    #[error("statement has no parameter named :{0}")]
    UnknownParameter(String),

    /// A result column held a value of an unexpected type.
    #[error("column `{column}` has unexpected type (expected {expected})")]
    ColumnType {
        column: &'static str,
        expected: &'static str,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
