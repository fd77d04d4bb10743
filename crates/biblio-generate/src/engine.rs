use std::str::FromStr;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sqlx::PgPool;
use tracing::{info, warn};

use biblio_core::{Column, FieldValue, Result, TableId};
use biblio_introspect::{Catalog, IntrospectOptions, PostgresCatalog};

use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport};
use crate::policy::{self, ColumnRule, PlannedColumn, TablePlan};
use crate::postgres::PgTarget;
use crate::target::{GeneratedCell, GenerationTarget};

/// Entry point for synthesizing rows from catalog columns.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Synthesize and insert `count` rows of `table` into `target`.
    ///
    /// Stops at the first failing row; the caller owns rollback.
    pub async fn run<T>(
        &self,
        target: &mut T,
        table: TableId,
        columns: &[Column],
        count: u64,
    ) -> std::result::Result<GenerationReport, GenerationError>
    where
        T: GenerationTarget + ?Sized,
    {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let plan = policy::plan_table(table, columns)?;
        let mut report =
            GenerationReport::new(run_id.clone(), table.name().to_string(), count, seed);
        report.database_assigned = plan.database_assigned.clone();
        report.skipped_columns = plan.skipped.clone();

        if plan.columns.iter().any(|col| col.rule == ColumnRule::NextKey) {
            warn!(
                table = %table,
                "table key has no sequence, falling back to max(key) + 1"
            );
        }

        info!(
            run_id = %run_id,
            table = %table,
            rows = count,
            seed,
            skipped = plan.skipped.len(),
            "generation started"
        );

        let mut last_name: Option<String> = None;
        for row_idx in 0..count {
            let inserted =
                match synthesize_row(&mut *target, table, &plan, &mut rng, &mut last_name).await {
                    Ok(row) => target.insert_row(table, &row).await,
                    Err(err) => Err(err),
                };

            if let Err(source) = inserted {
                warn!(
                    run_id = %run_id,
                    table = %table,
                    row = row_idx,
                    error = %source,
                    "generation failed"
                );
                return Err(GenerationError::RowFailed {
                    table: table.name().to_string(),
                    row: row_idx,
                    source,
                });
            }
            report.rows_inserted += 1;
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            table = %table,
            rows_inserted = report.rows_inserted,
            duration_ms = report.duration_ms,
            "generation completed"
        );
        Ok(report)
    }
}

async fn synthesize_row<T>(
    target: &mut T,
    table: TableId,
    plan: &TablePlan,
    rng: &mut ChaCha8Rng,
    last_name: &mut Option<String>,
) -> Result<Vec<GeneratedCell>>
where
    T: GenerationTarget + ?Sized,
{
    let mut row = Vec::with_capacity(plan.columns.len());
    for PlannedColumn { name, kind, rule } in &plan.columns {
        let value = match rule {
            ColumnRule::NextKey => FieldValue::Int(target.next_key(table).await?),
            ColumnRule::Name => {
                let name = policy::pick_name(rng);
                *last_name = Some(name.to_string());
                FieldValue::Text(name.to_string())
            }
            ColumnRule::Email => {
                let name = match last_name.as_deref() {
                    Some(name) => name.to_string(),
                    None => {
                        let name = policy::pick_name(rng).to_string();
                        *last_name = Some(name.clone());
                        name
                    }
                };
                FieldValue::Text(policy::email_for(&name))
            }
            ColumnRule::ForeignKey(parent) => {
                let roll: f64 = rng.random();
                FieldValue::Int(target.pick_parent_key(*parent, roll).await?)
            }
            ColumnRule::Integer => policy::random_int(rng),
            ColumnRule::Text => policy::random_text(rng),
            ColumnRule::Timestamp => policy::random_timestamp(rng)?,
        };
        row.push(GeneratedCell {
            column: name.clone(),
            kind: *kind,
            value,
        });
    }
    Ok(row)
}

/// Insert `count` synthesized rows into `namespace.table` in one transaction.
///
/// Column metadata is read from the catalog. On any failure the transaction
/// is rolled back and no row of the batch survives.
pub async fn generate_rows(
    pool: &PgPool,
    namespace: &str,
    table: &str,
    count: u64,
    options: GenerateOptions,
) -> std::result::Result<GenerationReport, GenerationError> {
    let table = TableId::from_str(table)?;
    let catalog = PostgresCatalog::new(
        pool.clone(),
        IntrospectOptions {
            namespace: namespace.to_string(),
            ..IntrospectOptions::default()
        },
    );
    let columns = catalog.columns(table.name()).await?;
    if columns.is_empty() {
        return Err(GenerationError::MissingTable {
            namespace: namespace.to_string(),
            table: table.name().to_string(),
        });
    }

    let tx = pool
        .begin()
        .await
        .map_err(|err| biblio_core::Error::Db(err.to_string()))?;
    let mut target = PgTarget::new(tx, namespace);
    let engine = GenerationEngine::new(options);

    match engine.run(&mut target, table, &columns, count).await {
        Ok(report) => {
            target.commit().await?;
            Ok(report)
        }
        Err(err) => {
            if let Err(rollback) = target.rollback().await {
                warn!(table = %table, error = %rollback, "rollback after failed batch failed");
            }
            Err(err)
        }
    }
}
