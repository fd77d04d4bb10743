//! Conversions between [`FieldValue`] and sqlx arguments/rows.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, Row};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;

use biblio_core::{Error, FieldKind, FieldValue, Result};

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind `value` typed by the column kind so NULLs carry the right type.
pub fn bind_value<'q>(query: PgQuery<'q>, kind: FieldKind, value: &FieldValue) -> PgQuery<'q> {
    match (kind, value) {
        (_, FieldValue::Int(value)) => query.bind(*value),
        (_, FieldValue::Text(value)) => query.bind(value.clone()),
        (_, FieldValue::Timestamp(value)) => query.bind(*value),
        (FieldKind::Integer, FieldValue::Null) => query.bind(None::<i32>),
        (FieldKind::VarChar, FieldValue::Null) => query.bind(None::<String>),
        (FieldKind::TimestampTz, FieldValue::Null) => query.bind(None::<DateTime<Utc>>),
    }
}

/// Read column `idx` of `row` as a value of `kind`.
pub fn decode_value(row: &PgRow, idx: usize, kind: FieldKind) -> Result<FieldValue> {
    let value = match kind {
        FieldKind::Integer => row
            .try_get::<Option<i32>, _>(idx)
            .map(|value| value.map(FieldValue::Int)),
        FieldKind::VarChar => row
            .try_get::<Option<String>, _>(idx)
            .map(|value| value.map(FieldValue::Text)),
        FieldKind::TimestampTz => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)
            .map(|value| value.map(FieldValue::Timestamp)),
    };
    value
        .map(|value| value.unwrap_or(FieldValue::Null))
        .map_err(|err| Error::Db(err.to_string()))
}
