//! Error types.
//!
//! `DbError` covers the storage core. `RowError` and `PrepareError` belong to
//! the input boundary and never reach the pager.

use thiserror::Error;

/// Result type alias using DbError
pub type Result<T> = std::result::Result<T, DbError>;

/// Failures raised by the pager and the row table.
#[derive(Debug, Error)]
pub enum DbError {
    /// A page number outside the configured capacity.
    #[error("Tried to fetch page number out of bounds. {page} >= {max}")]
    OutOfRange { page: usize, max: usize },

    /// A row index at or past the number of stored rows.
    #[error("Row {row} does not exist, the table holds {num_rows} rows.")]
    RowOutOfRange { row: usize, num_rows: usize },

    #[error("Table full.")]
    TableFull,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A field value that cannot be stored in its fixed-width column.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("String is too long.")]
    StringTooLong { field: &'static str, max: usize },

    #[error("String contains a null byte.")]
    NulByte { field: &'static str },
}

/// Reasons a line of input could not be turned into a statement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Unrecognized keyword at start of '{0}'.")]
    Unrecognized(String),

    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,

    #[error("ID must be positive.")]
    NegativeId,

    #[error(transparent)]
    Row(#[from] RowError),
}
