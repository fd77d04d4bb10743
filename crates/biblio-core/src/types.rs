use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::FieldDef;

/// Column type families the bibliographic schema uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    VarChar,
    TimestampTz,
}

impl FieldKind {
    /// Map an `information_schema.columns.data_type` value to a kind.
    pub fn from_data_type(data_type: &str) -> Option<Self> {
        match data_type {
            "integer" => Some(FieldKind::Integer),
            "character varying" => Some(FieldKind::VarChar),
            "timestamp with time zone" => Some(FieldKind::TimestampTz),
            _ => None,
        }
    }
}

/// A single cell value read from or written to a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Int(i32),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Parse a caller-supplied string against the column definition.
    pub fn parse(field: &FieldDef, raw: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidValue {
            column: field.name.to_string(),
            reason,
        };

        match field.kind {
            FieldKind::Integer => raw
                .trim()
                .parse::<i32>()
                .map(FieldValue::Int)
                .map_err(|err| invalid(format!("expected integer: {err}"))),
            FieldKind::VarChar => {
                let len = raw.chars().count();
                match field.max_len {
                    Some(max) if len > max => {
                        Err(invalid(format!("{len} characters exceeds limit of {max}")))
                    }
                    _ => Ok(FieldValue::Text(raw.to_string())),
                }
            }
            FieldKind::TimestampTz => DateTime::parse_from_rfc3339(raw.trim())
                .map(|value| FieldValue::Timestamp(value.with_timezone(&Utc)))
                .map_err(|err| invalid(format!("expected RFC 3339 timestamp: {err}"))),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("NULL"),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Timestamp(value) => f.write_str(&value.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TableId;

    #[test]
    fn parses_integers_for_key_columns() {
        let field = TableId::TopicArticle.entity().field("article_id").unwrap();
        assert_eq!(FieldValue::parse(field, " 42 ").unwrap(), FieldValue::Int(42));
        assert!(matches!(
            FieldValue::parse(field, "forty-two"),
            Err(Error::InvalidValue { column, .. }) if column == "article_id"
        ));
        assert!(FieldValue::parse(field, "99999999999").is_err());
    }

    #[test]
    fn enforces_varchar_length() {
        let field = TableId::Topic.entity().field("topicname").unwrap();
        assert_eq!(
            FieldValue::parse(field, "Databases").unwrap(),
            FieldValue::Text("Databases".to_string())
        );
        let too_long = "x".repeat(21);
        assert!(FieldValue::parse(field, &too_long).is_err());
    }

    #[test]
    fn parses_timestamps_to_utc() {
        let field = FieldDef {
            name: "created_at",
            kind: FieldKind::TimestampTz,
            max_len: None,
        };
        let value = FieldValue::parse(&field, "2022-01-01T08:30:00+03:00").unwrap();
        assert_eq!(value.to_string(), "2022-01-01T05:30:00+00:00");
    }

    #[test]
    fn maps_catalog_data_types() {
        assert_eq!(FieldKind::from_data_type("integer"), Some(FieldKind::Integer));
        assert_eq!(
            FieldKind::from_data_type("timestamp with time zone"),
            Some(FieldKind::TimestampTz)
        );
        assert_eq!(FieldKind::from_data_type("boolean"), None);
    }
}
