use sqlx::PgPool;

use biblio_core::{Error, Result};

pub struct RawTable {
    pub name: String,
    pub table_type: String,
}

pub async fn list_tables_in_schema(pool: &PgPool, schema: &str) -> Result<Vec<RawTable>> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        select
          t.table_name::text,
          t.table_type::text
        from information_schema.tables t
        where t.table_schema = $1
        order by t.table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::Db(err.to_string()))?;

    Ok(rows
        .into_iter()
        .map(|(name, table_type)| RawTable { name, table_type })
        .collect())
}

pub struct RawColumn {
    pub ordinal_position: i32,
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub identity_generation: Option<String>,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query_as::<_, (i32, String, String, bool, Option<String>, Option<String>)>(
        r#"
        select
          c.ordinal_position::int4,
          c.column_name::text,
          c.data_type::text,
          (c.is_nullable = 'YES'),
          c.column_default::text,
          case when c.is_identity = 'YES' then c.identity_generation::text else null end
        from information_schema.columns c
        where c.table_schema = $1
          and c.table_name = $2
        order by c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::Db(err.to_string()))?;

    Ok(rows
        .into_iter()
        .map(
            |(ordinal_position, name, data_type, is_nullable, default, identity_generation)| {
                RawColumn {
                    ordinal_position,
                    name,
                    data_type,
                    is_nullable,
                    default,
                    identity_generation,
                }
            },
        )
        .collect())
}
