use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for the value RNG; a random one is drawn when absent.
    pub seed: Option<u64>,
}

/// Summary of a generate-rows call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub table: String,
    pub rows_requested: u64,
    pub rows_inserted: u64,
    pub seed: u64,
    /// Key columns filled by the database.
    pub database_assigned: Vec<String>,
    /// Columns the policy left out of the insert.
    pub skipped_columns: Vec<String>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, table: String, rows_requested: u64, seed: u64) -> Self {
        Self {
            run_id,
            table,
            rows_requested,
            rows_inserted: 0,
            seed,
            database_assigned: Vec::new(),
            skipped_columns: Vec::new(),
            duration_ms: 0,
        }
    }
}
