//! Per-column synthesis policy.
//!
//! A table's catalog columns are planned once into [`PlannedColumn`]s; each
//! row then draws values from the planned rules. Precedence:
//!
//! 1. the table's own key (`<table>_id`),
//! 2. `name`,
//! 3. `email`,
//! 4. any other `*_id` column (foreign key),
//! 5. the declared type (`integer`, `character varying`,
//!    `timestamp with time zone`).
//!
//! Columns matching none of these are skipped.

use chrono::{DateTime, Utc};
use rand::Rng;

use biblio_core::{Column, Error, FieldKind, FieldValue, Result, TableId};

pub const NAME_CATALOG: &[&str] = &["Olexandr", "Maria", "Ivan", "Anna", "Dmitro"];
pub const TEXT_CATALOG: &[&str] = &["some text", "not some text"];
pub const EMAIL_DOMAIN: &str = "example.com";
pub const INT_UPPER_BOUND: i32 = 100;

/// 2022-01-01 08:30:00+03.
pub const TIMESTAMP_WINDOW_START: i64 = 1_641_015_000;
/// 2022-10-01 08:30:00+03, exclusive.
pub const TIMESTAMP_WINDOW_END: i64 = 1_664_602_200;

/// How a single column gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// Own key without a sequence: `max(key) + 1`.
    NextKey,
    Name,
    Email,
    ForeignKey(TableId),
    Integer,
    Text,
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedColumn {
    pub name: String,
    pub kind: FieldKind,
    pub rule: ColumnRule,
}

/// Planned columns plus the ones left to the database.
#[derive(Debug, Clone, Default)]
pub struct TablePlan {
    pub columns: Vec<PlannedColumn>,
    /// Own key filled by a sequence or identity.
    pub database_assigned: Vec<String>,
    /// Columns of a type the policy does not synthesize.
    pub skipped: Vec<String>,
}

/// Plan the columns of `table` as reported by the catalog.
pub fn plan_table(table: TableId, columns: &[Column]) -> Result<TablePlan> {
    let key_column = format!("{}_id", table.name().to_lowercase());
    let mut plan = TablePlan::default();

    for column in columns {
        let text_kind = column.kind().unwrap_or(FieldKind::VarChar);
        let rule = if column.name == key_column {
            if column.is_database_assigned() {
                plan.database_assigned.push(column.name.clone());
                continue;
            }
            Some((FieldKind::Integer, ColumnRule::NextKey))
        } else if column.name == "name" {
            Some((text_kind, ColumnRule::Name))
        } else if column.name == "email" {
            Some((text_kind, ColumnRule::Email))
        } else if column.name.ends_with("_id") {
            let parent = TableId::from_fk_column(&column.name)?;
            Some((FieldKind::Integer, ColumnRule::ForeignKey(parent)))
        } else {
            column.kind().map(|kind| {
                let rule = match kind {
                    FieldKind::Integer => ColumnRule::Integer,
                    FieldKind::VarChar => ColumnRule::Text,
                    FieldKind::TimestampTz => ColumnRule::Timestamp,
                };
                (kind, rule)
            })
        };

        match rule {
            Some((kind, rule)) => plan.columns.push(PlannedColumn {
                name: column.name.clone(),
                kind,
                rule,
            }),
            None => plan.skipped.push(column.name.clone()),
        }
    }

    Ok(plan)
}

pub fn pick_name(rng: &mut dyn rand::RngCore) -> &'static str {
    NAME_CATALOG[rng.random_range(0..NAME_CATALOG.len())]
}

pub fn email_for(name: &str) -> String {
    format!("{name}@{EMAIL_DOMAIN}")
}

pub fn random_int(rng: &mut dyn rand::RngCore) -> FieldValue {
    FieldValue::Int(rng.random_range(0..INT_UPPER_BOUND))
}

pub fn random_text(rng: &mut dyn rand::RngCore) -> FieldValue {
    FieldValue::Text(TEXT_CATALOG[rng.random_range(0..TEXT_CATALOG.len())].to_string())
}

pub fn random_timestamp(rng: &mut dyn rand::RngCore) -> Result<FieldValue> {
    let secs = rng.random_range(TIMESTAMP_WINDOW_START..TIMESTAMP_WINDOW_END);
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(FieldValue::Timestamp)
        .ok_or_else(|| Error::Other(format!("timestamp {secs} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_core::IdentityGeneration;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn column(name: &str, data_type: &str) -> Column {
        Column {
            ordinal_position: 0,
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: false,
            default: None,
            identity: None,
        }
    }

    #[test]
    fn plans_author_columns() {
        let mut key = column("author_id", "integer");
        key.default = Some("nextval('\"Author_author_id_seq\"'::regclass)".to_string());
        let columns = vec![
            key,
            column("name", "character varying"),
            column("affiliation", "character varying"),
            column("email", "character varying"),
        ];

        let plan = plan_table(TableId::Author, &columns).unwrap();
        assert_eq!(plan.database_assigned, vec!["author_id"]);
        let rules: Vec<ColumnRule> = plan.columns.iter().map(|col| col.rule).collect();
        assert_eq!(rules, vec![ColumnRule::Name, ColumnRule::Text, ColumnRule::Email]);
    }

    #[test]
    fn key_without_sequence_falls_back_to_next_key() {
        let plan = plan_table(TableId::Topic, &[column("topic_id", "integer")]).unwrap();
        assert_eq!(plan.columns[0].rule, ColumnRule::NextKey);
        assert!(plan.database_assigned.is_empty());
    }

    #[test]
    fn identity_key_is_left_to_the_database() {
        let mut key = column("article_author_id", "integer");
        key.identity = Some(IdentityGeneration::ByDefault);
        let plan = plan_table(TableId::ArticleAuthor, &[key]).unwrap();
        assert_eq!(plan.database_assigned, vec!["article_author_id"]);
        assert!(plan.columns.is_empty());
    }

    #[test]
    fn join_columns_become_foreign_keys() {
        let columns = vec![
            column("topicarticle_id", "integer"),
            column("article_id", "integer"),
            column("topic_id", "integer"),
        ];
        let plan = plan_table(TableId::TopicArticle, &columns).unwrap();
        let rules: Vec<ColumnRule> = plan.columns.iter().map(|col| col.rule).collect();
        assert_eq!(
            rules,
            vec![
                ColumnRule::NextKey,
                ColumnRule::ForeignKey(TableId::Article),
                ColumnRule::ForeignKey(TableId::Topic),
            ]
        );
    }

    #[test]
    fn dispatches_on_type_and_skips_the_rest() {
        let columns = vec![
            column("pages", "integer"),
            column("title", "character varying"),
            column("published_at", "timestamp with time zone"),
            column("is_open_access", "boolean"),
        ];
        let plan = plan_table(TableId::Article, &columns).unwrap();
        let rules: Vec<ColumnRule> = plan.columns.iter().map(|col| col.rule).collect();
        assert_eq!(
            rules,
            vec![ColumnRule::Integer, ColumnRule::Text, ColumnRule::Timestamp]
        );
        assert_eq!(plan.skipped, vec!["is_open_access"]);
    }

    #[test]
    fn unknown_parent_table_fails_planning() {
        let err = plan_table(TableId::Article, &[column("publisher_id", "integer")]).unwrap_err();
        assert!(matches!(err, Error::UnknownTable(name) if name == "Publisher"));
    }

    #[test]
    fn values_stay_inside_their_catalogs_and_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let start = DateTime::parse_from_rfc3339("2022-01-01T08:30:00+03:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2022-10-01T08:30:00+03:00").unwrap();
        assert_eq!(start.timestamp(), TIMESTAMP_WINDOW_START);
        assert_eq!(end.timestamp(), TIMESTAMP_WINDOW_END);

        for _ in 0..200 {
            assert!(NAME_CATALOG.contains(&pick_name(&mut rng)));

            let value = random_int(&mut rng).as_i32().unwrap();
            assert!((0..INT_UPPER_BOUND).contains(&value));

            let text = random_text(&mut rng);
            assert!(TEXT_CATALOG.contains(&text.as_str().unwrap()));

            match random_timestamp(&mut rng).unwrap() {
                FieldValue::Timestamp(ts) => {
                    assert!(ts.timestamp() >= TIMESTAMP_WINDOW_START);
                    assert!(ts.timestamp() < TIMESTAMP_WINDOW_END);
                }
                other => panic!("expected timestamp, got {other:?}"),
            }
        }
    }

    #[test]
    fn email_uses_the_name() {
        assert_eq!(email_for("Anna"), "Anna@example.com");
    }
}
