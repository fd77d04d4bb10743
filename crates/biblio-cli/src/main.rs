mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use biblio_core::{Error as CoreError, redact_connection_string};
use biblio_generate::{GenerateOptions, GenerationError, generate_rows};
use biblio_introspect::{Catalog, IntrospectOptions, PostgresCatalog};
use biblio_store::{GroupedCountQuery, Store, WriteOutcome};
use clap::{Args, Parser, Subcommand};
use config::{BiblioConfig, ConfigError};
use logging::{LoggingError, init_logging};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

const NOT_FOUND_EXIT: u8 = 2;

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Generation(#[from] GenerationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
}

#[derive(Parser, Debug)]
#[command(name = "biblio", version, about = "Bibliographic database helper")]
struct Cli {
    /// Database connection string.
    #[arg(long, global = true, value_name = "CONNECTION_STRING")]
    conn: Option<String>,
    /// Config file (default: ./biblio.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Schema holding the bibliographic tables.
    #[arg(long, global = true)]
    namespace: Option<String>,
    /// Append JSON logs here instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tables of the namespace.
    Tables,
    /// Insert one row.
    Insert(InsertArgs),
    /// Set one column of a row.
    Update(UpdateArgs),
    /// Delete a row by primary key.
    Delete(DeleteArgs),
    /// Print every row of a table.
    Dump(TableArg),
    /// Count join rows per group.
    Report(ReportArgs),
    /// Insert synthetic rows.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct TableArg {
    table: String,
}

#[derive(Args, Debug)]
struct InsertArgs {
    table: String,
    /// Column name; repeat, paired in order with --value.
    #[arg(long = "column")]
    columns: Vec<String>,
    #[arg(long = "value")]
    values: Vec<String>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    table: String,
    id: i32,
    column: String,
    value: String,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    table: String,
    id: i32,
}

#[derive(Args, Debug)]
struct ReportArgs {
    table: String,
    join_table: String,
    #[arg(long)]
    filter_column: String,
    #[arg(long)]
    filter_value: String,
    #[arg(long)]
    group_by: String,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    table: String,
    count: u64,
    /// Fix the random seed for a reproducible batch.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = BiblioConfig::load(cli.config.as_deref())?;
    let conn = config.resolve_connection(cli.conn, std::env::var("DATABASE_URL").ok())?;
    let namespace = cli.namespace.unwrap_or_else(|| config.namespace.clone());
    let engine = detect_engine(&conn)?;

    let connection = redact_connection_string(&conn);
    tracing::info!(
        event = "command_started",
        engine = %engine,
        connection = %connection.redacted,
        namespace = %namespace
    );

    let timer = Instant::now();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&conn)
        .await?;

    let code = run_command(cli.command, pool, namespace).await?;

    tracing::info!(
        event = "command_finished",
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(code)
}

async fn run_command(
    command: Command,
    pool: PgPool,
    namespace: String,
) -> Result<ExitCode, CliError> {
    match command {
        Command::Tables => {
            let catalog = PostgresCatalog::new(
                pool,
                IntrospectOptions {
                    namespace,
                    ..IntrospectOptions::default()
                },
            );
            for table in catalog.tables().await? {
                println!("{table}");
            }
        }
        Command::Insert(args) => {
            let store = Store::new(pool, namespace);
            store
                .create_row(&args.table, &args.columns, &args.values)
                .await?;
            println!("inserted into {}", args.table);
        }
        Command::Update(args) => {
            let store = Store::new(pool, namespace);
            let outcome = store
                .update_field(&args.table, args.id, &args.column, &args.value)
                .await?;
            return Ok(report_outcome(outcome, "updated", &args.table, args.id));
        }
        Command::Delete(args) => {
            let store = Store::new(pool, namespace);
            let outcome = store.delete_row(&args.table, args.id).await?;
            return Ok(report_outcome(outcome, "deleted", &args.table, args.id));
        }
        Command::Dump(args) => {
            let store = Store::new(pool, namespace);
            for record in store.dump_rows(&args.table).await? {
                println!("{record}");
            }
        }
        Command::Report(args) => {
            let store = Store::new(pool, namespace);
            let request = GroupedCountQuery {
                table: args.table,
                join_table: args.join_table,
                filter_column: args.filter_column,
                filter_value: args.filter_value,
                group_column: args.group_by,
            };
            for group in store.grouped_count(&request).await? {
                println!("{group}");
            }
        }
        Command::Generate(args) => {
            let options = GenerateOptions { seed: args.seed };
            let report = generate_rows(&pool, &namespace, &args.table, args.count, options).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn report_outcome(outcome: WriteOutcome, verb: &str, table: &str, id: i32) -> ExitCode {
    match outcome {
        WriteOutcome::Applied => {
            println!("{verb} {table} {id}");
            ExitCode::SUCCESS
        }
        WriteOutcome::NotFound => {
            println!("no {table} row with id {id}");
            ExitCode::from(NOT_FOUND_EXIT)
        }
    }
}

fn detect_engine(conn: &str) -> Result<&'static str, CliError> {
    if conn.starts_with("postgres://") || conn.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(CliError::UnsupportedEngine(
            redact_connection_string(conn).redacted,
        ))
    }
}
