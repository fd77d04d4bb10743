use async_trait::async_trait;

use biblio_core::{Column, Result};

/// Trait implemented by database adapters that can describe their tables.
#[async_trait]
pub trait Catalog {
    /// Table names in the configured namespace, sorted.
    async fn tables(&self) -> Result<Vec<String>>;

    /// Columns of `table` in ordinal order.
    async fn columns(&self, table: &str) -> Result<Vec<Column>>;
}
