use thiserror::Error;

/// Core error type shared across Biblio crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Database error or driver failure.
    #[error("database error: {0}")]
    Db(String),
    /// Table name outside the registry.
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// Column not declared by the entity.
    #[error("unknown column '{column}' in table {table}")]
    UnknownColumn { table: String, column: String },
    /// A caller-supplied value could not be converted for its column.
    #[error("invalid value for column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },
    #[error("got {columns} columns but {values} values")]
    ArityMismatch { columns: usize, values: usize },
    /// A foreign key cannot be satisfied because the parent table is empty.
    #[error("no parent rows in table {0}")]
    NoParentRows(String),
    /// A requested feature is not supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by Biblio crates.
pub type Result<T> = std::result::Result<T, Error>;
