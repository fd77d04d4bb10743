use std::str::FromStr;

use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{debug, info, warn};

use biblio_core::{EntityDef, Error, FieldDef, FieldValue, Result, TableId};

use crate::bind::{bind_value, decode_value};
use crate::model::{GroupCount, GroupedCountQuery, Record, WriteOutcome};
use crate::sql;

fn db_err(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}

/// CRUD and report operations over one namespace.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
    namespace: String,
}

impl Store {
    pub fn new(pool: PgPool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Insert one row from parallel column/value lists.
    pub async fn create_row<C, V>(&self, table: &str, columns: &[C], values: &[V]) -> Result<()>
    where
        C: AsRef<str>,
        V: AsRef<str>,
    {
        let entity = TableId::from_str(table)?.entity();
        if columns.len() != values.len() {
            return Err(Error::ArityMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }

        let mut typed: Vec<(&'static FieldDef, FieldValue)> = Vec::with_capacity(columns.len());
        for (column, raw) in columns.iter().zip(values) {
            let field = entity.field(column.as_ref())?;
            typed.push((field, FieldValue::parse(field, raw.as_ref())?));
        }

        let names: Vec<&str> = typed.iter().map(|(field, _)| field.name).collect();
        let statement = sql::insert_statement(&self.namespace, entity.table.name(), &names);
        let mut query = sqlx::query(&statement);
        for (field, value) in &typed {
            query = bind_value(query, field.kind, value);
        }

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        if let Err(err) = query.execute(&mut *tx).await {
            warn!(event = "create_failed", table = %entity.table, error = %err);
            rollback_quietly(tx, entity.table).await;
            return Err(db_err(err));
        }

        // An explicit key bypasses the sequence; keep later defaults clear of it.
        if names.contains(&entity.primary_key) {
            let statement = sql::sync_key_sequence_statement(
                &self.namespace,
                entity.table.name(),
                entity.primary_key,
            );
            let synced = sqlx::query(&statement)
                .bind(sql::qualified(&self.namespace, entity.table.name()))
                .bind(entity.primary_key)
                .execute(&mut *tx)
                .await;
            if let Err(err) = synced {
                warn!(event = "sequence_sync_failed", table = %entity.table, error = %err);
                rollback_quietly(tx, entity.table).await;
                return Err(db_err(err));
            }
            debug!(event = "sequence_synced", table = %entity.table, key = entity.primary_key);
        }
        tx.commit().await.map_err(db_err)?;

        info!(event = "row_created", table = %entity.table, columns = names.len());
        Ok(())
    }

    /// Set one column of the row with primary key `id`.
    pub async fn update_field(
        &self,
        table: &str,
        id: i32,
        column: &str,
        value: &str,
    ) -> Result<WriteOutcome> {
        let entity = TableId::from_str(table)?.entity();
        let field = entity.field(column)?;
        if field.name == entity.primary_key {
            return Err(Error::Unsupported(format!(
                "primary key {}.{} cannot be updated",
                entity.table, field.name
            )));
        }
        let value = FieldValue::parse(field, value)?;

        let statement = sql::update_statement(
            &self.namespace,
            entity.table.name(),
            field.name,
            entity.primary_key,
        );
        let query = bind_value(sqlx::query(&statement), field.kind, &value).bind(id);

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let result = match query.execute(&mut *tx).await {
            Ok(result) => result,
            Err(err) => {
                warn!(event = "update_failed", table = %entity.table, id, error = %err);
                rollback_quietly(tx, entity.table).await;
                return Err(db_err(err));
            }
        };

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(db_err)?;
            info!(event = "update_not_found", table = %entity.table, id);
            return Ok(WriteOutcome::NotFound);
        }
        tx.commit().await.map_err(db_err)?;

        info!(event = "row_updated", table = %entity.table, id, column = field.name);
        Ok(WriteOutcome::Applied)
    }

    /// Delete the row with primary key `id`.
    pub async fn delete_row(&self, table: &str, id: i32) -> Result<WriteOutcome> {
        let entity = TableId::from_str(table)?.entity();
        let statement =
            sql::delete_statement(&self.namespace, entity.table.name(), entity.primary_key);

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let result = match sqlx::query(&statement).bind(id).execute(&mut *tx).await {
            Ok(result) => result,
            Err(err) => {
                warn!(event = "delete_failed", table = %entity.table, id, error = %err);
                rollback_quietly(tx, entity.table).await;
                return Err(db_err(err));
            }
        };

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(db_err)?;
            info!(event = "delete_not_found", table = %entity.table, id);
            return Ok(WriteOutcome::NotFound);
        }
        tx.commit().await.map_err(db_err)?;

        info!(event = "row_deleted", table = %entity.table, id);
        Ok(WriteOutcome::Applied)
    }

    /// Every row of `table`, ordered by primary key.
    pub async fn dump_rows(&self, table: &str) -> Result<Vec<Record>> {
        let entity = TableId::from_str(table)?.entity();
        let names: Vec<&str> = entity.column_names().collect();
        let statement = sql::select_all_statement(
            &self.namespace,
            entity.table.name(),
            &names,
            entity.primary_key,
        );

        let rows = sqlx::query(&statement)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| decode_record(entity, row))
            .collect()
    }

    /// Count join-table rows per group of `table`, largest groups first.
    pub async fn grouped_count(&self, request: &GroupedCountQuery) -> Result<Vec<GroupCount>> {
        let table = TableId::from_str(&request.table)?;
        let join_table = TableId::from_str(&request.join_table)?;
        let (_, join_key) = table.relationship_with(join_table).ok_or_else(|| {
            Error::Unsupported(format!("{table} and {join_table} are not related"))
        })?;

        let entity = table.entity();
        let filter = entity.field(&request.filter_column)?;
        let group = entity.field(&request.group_column)?;
        let filter_value = FieldValue::parse(filter, &request.filter_value)?;

        let statement = sql::grouped_count_statement(&sql::GroupedCountParts {
            namespace: &self.namespace,
            table: table.name(),
            join_table: join_table.name(),
            join_key,
            counted_key: join_table.primary_key(),
            filter_column: filter.name,
            group_column: group.name,
        });

        let rows = bind_value(sqlx::query(&statement), filter.kind, &filter_value)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                let total = row.try_get::<i64, _>(1).map_err(db_err)?;
                Ok(GroupCount {
                    group: decode_value(row, 0, group.kind)?,
                    total,
                })
            })
            .collect()
    }
}

/// Roll back after a failed statement. A rollback failure is only logged so
/// the statement's own error reaches the caller.
async fn rollback_quietly(tx: Transaction<'static, Postgres>, table: TableId) {
    if let Err(err) = tx.rollback().await {
        warn!(event = "rollback_failed", table = %table, error = %err);
    }
}

fn decode_record(entity: &EntityDef, row: &sqlx::postgres::PgRow) -> Result<Record> {
    let values = entity
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| Ok((field.name, decode_value(row, idx, field.kind)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Record {
        table: entity.table,
        values,
    })
}
