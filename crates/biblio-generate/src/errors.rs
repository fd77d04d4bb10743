use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Core(#[from] biblio_core::Error),
    #[error("table {namespace}.{table} has no columns in the catalog")]
    MissingTable { namespace: String, table: String },
    /// A row failed; the whole batch was rolled back.
    #[error("generation of {table} failed at row {row}: {source}")]
    RowFailed {
        table: String,
        row: u64,
        #[source]
        source: biblio_core::Error,
    },
}
