use sqlx::PgPool;
use tracing::debug;

use biblio_core::{Column, Result};

use crate::adapter::Catalog;
use crate::options::IntrospectOptions;

mod mapper;
mod queries;

/// Catalog reader for PostgreSQL databases.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
    opts: IntrospectOptions,
}

impl PostgresCatalog {
    /// Create a new catalog reader using a pre-configured pool.
    pub fn new(pool: PgPool, opts: IntrospectOptions) -> Self {
        Self { pool, opts }
    }
}

#[async_trait::async_trait]
impl Catalog for PostgresCatalog {
    async fn tables(&self) -> Result<Vec<String>> {
        let namespace = &self.opts.namespace;
        let raw = queries::list_tables_in_schema(&self.pool, namespace).await?;
        let tables = mapper::map_tables(raw, &self.opts);
        debug!(namespace = %namespace, tables = tables.len(), "tables listed");
        Ok(tables)
    }

    async fn columns(&self, table: &str) -> Result<Vec<Column>> {
        let namespace = self.opts.namespace.as_str();
        let raw = queries::list_columns(&self.pool, namespace, table).await?;
        let columns = mapper::map_columns(raw);
        debug!(namespace, table, columns = columns.len(), "columns introspected");
        Ok(columns)
    }
}
