//! Error taxonomy for table construction and join evaluation

use thiserror::Error;

/// Errors raised by table construction and the join/duplicate operations.
///
/// All of these are programming or input errors: the operations are
/// deterministic, so retrying without fixing the input reproduces the
/// same error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TabError {
    /// A row's cell count does not match the table's declared column set.
    #[error("row {row} of table '{table}' has {found} cells but {expected} columns are declared")]
    SchemaMismatch {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Two columns in the same table share a name.
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// A requested key or check column does not exist in the given table.
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Left and right key-column lists have different (or zero) lengths.
    #[error("join key lists must have the same non-zero length (left has {left}, right has {right})")]
    JoinSpecArityMismatch { left: usize, right: usize },
}

pub type Result<T> = std::result::Result<T, TabError>;
