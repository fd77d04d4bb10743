use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use biblio_core::{Error, Result, TableId};
use biblio_store::bind::bind_value;
use biblio_store::sql;

use crate::target::{GenerationTarget, GeneratedCell, roll_index};

fn db_err(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}

/// Target writing into one open transaction. Nothing is visible to other
/// sessions until [`PgTarget::commit`].
pub struct PgTarget {
    tx: Transaction<'static, Postgres>,
    namespace: String,
}

impl PgTarget {
    pub fn new(tx: Transaction<'static, Postgres>, namespace: impl Into<String>) -> Self {
        Self {
            tx,
            namespace: namespace.into(),
        }
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(db_err)
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await.map_err(db_err)
    }
}

#[async_trait]
impl GenerationTarget for PgTarget {
    async fn next_key(&mut self, table: TableId) -> Result<i32> {
        let statement = sql::max_key_statement(&self.namespace, table.name(), table.primary_key());
        let max: i32 = sqlx::query_scalar(&statement)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_err)?;
        Ok(max + 1)
    }

    async fn pick_parent_key(&mut self, parent: TableId, roll: f64) -> Result<i32> {
        let count: i64 = sqlx::query_scalar(&sql::count_statement(&self.namespace, parent.name()))
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_err)?;
        if count <= 0 {
            return Err(Error::NoParentRows(parent.name().to_string()));
        }

        let offset = roll_index(roll, count as u64) as i64;
        let statement =
            sql::nth_key_statement(&self.namespace, parent.name(), parent.primary_key());
        sqlx::query_scalar::<_, i32>(&statement)
            .bind(offset)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_err)
    }

    async fn insert_row(&mut self, table: TableId, row: &[GeneratedCell]) -> Result<()> {
        let columns: Vec<&str> = row.iter().map(|cell| cell.column.as_str()).collect();
        let statement = sql::insert_statement(&self.namespace, table.name(), &columns);
        let mut query = sqlx::query(&statement);
        for cell in row {
            query = bind_value(query, cell.kind, &cell.value);
        }
        query.execute(&mut *self.tx).await.map_err(db_err)?;
        Ok(())
    }
}
