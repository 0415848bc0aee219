//! Table construction errors

use thiserror::Error;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised while assembling a table.
///
/// Duplicate row identifiers are not a construction error; they are a
/// certification failure reported by the schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column '{column}' has {found} values, index has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}
