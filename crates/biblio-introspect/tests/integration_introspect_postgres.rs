use anyhow::{Context, Result, anyhow};
use biblio_core::TableId;
use biblio_introspect::{Catalog, IntrospectOptions, PostgresCatalog};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, fs};

const FIXTURE_PATHS: &[&str] = &["fixtures/sql/postgres/001_schema.sql"];

fn database_url() -> Option<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok()
}

async fn run_fixture(pool: &PgPool, path: &str, namespace: &str) -> Result<()> {
    let full_path = format!("{}/../../{path}", env!("CARGO_MANIFEST_DIR"));
    let script =
        fs::read_to_string(&full_path).with_context(|| format!("reading fixture {path}"))?;

    for statement in script.replace("__NAMESPACE__", namespace).split(';') {
        let sql = statement.trim();
        if sql.is_empty() {
            continue;
        }

        sqlx::query(sql)
            .execute(pool)
            .await
            .with_context(|| format!("executing fixture {path}"))?;
    }

    Ok(())
}

#[tokio::test]
async fn introspects_bibliographic_tables() -> Result<()> {
    let Some(db_url) = database_url() else {
        eprintln!("skipping: set TEST_DATABASE_URL or DATABASE_URL for integration tests");
        return Ok(());
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(&db_url)
        .await
        .context("connecting to Postgres")?;

    let namespace = format!("biblio_introspect_{}", uuid::Uuid::new_v4().simple());
    for path in FIXTURE_PATHS {
        run_fixture(&pool, path, &namespace).await?;
    }

    let catalog = PostgresCatalog::new(
        pool.clone(),
        IntrospectOptions {
            namespace: namespace.clone(),
            ..IntrospectOptions::default()
        },
    );

    let mut expected: Vec<&str> = TableId::ALL.iter().map(|table| table.name()).collect();
    expected.sort();
    assert_eq!(catalog.tables().await?, expected);

    let columns = catalog.columns("Author").await?;
    let names: Vec<&str> = columns.iter().map(|col| col.name.as_str()).collect();
    assert_eq!(names, vec!["author_id", "name", "affiliation", "email"]);

    let pk = columns
        .iter()
        .find(|col| col.name == "author_id")
        .ok_or_else(|| anyhow!("author_id missing"))?;
    assert!(pk.is_database_assigned(), "serial key should carry a sequence default");

    let email = columns
        .iter()
        .find(|col| col.name == "email")
        .ok_or_else(|| anyhow!("email missing"))?;
    assert_eq!(email.data_type, "character varying");
    assert!(!email.is_nullable);

    assert!(catalog.columns("Publisher").await?.is_empty());

    sqlx::query(&format!(r#"drop schema "{namespace}" cascade"#))
        .execute(&pool)
        .await?;

    Ok(())
}
