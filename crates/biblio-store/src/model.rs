use std::fmt;

use serde::Serialize;

use biblio_core::{FieldValue, TableId};

/// Outcome of an update or delete addressed by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Applied,
    NotFound,
}

/// One row read back from a table, columns in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub table: TableId,
    pub values: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Primary key value of the record.
    pub fn id(&self) -> Option<i32> {
        self.get(self.table.primary_key())
            .and_then(FieldValue::as_i32)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.table)?;
        for (idx, (name, value)) in self.values.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// Grouped-count report request.
///
/// Joins `table` with `join_table` on their shared key, keeps rows where
/// `table.filter_column = filter_value`, and counts join rows per
/// `table.group_column`.
#[derive(Debug, Clone)]
pub struct GroupedCountQuery {
    pub table: String,
    pub join_table: String,
    pub filter_column: String,
    pub filter_value: String,
    pub group_column: String,
}

/// One line of a grouped-count report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub group: FieldValue,
    pub total: i64,
}

impl fmt::Display for GroupCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}|{}|", self.group, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_displays_like_a_constructor() {
        let record = Record {
            table: TableId::Topic,
            values: vec![
                ("topic_id", FieldValue::Int(3)),
                ("topicname", FieldValue::Text("Databases".to_string())),
                ("topicgeneralspecification", FieldValue::Null),
            ],
        };
        assert_eq!(
            record.to_string(),
            "Topic(topic_id=3, topicname=Databases, topicgeneralspecification=NULL)"
        );
        assert_eq!(record.id(), Some(3));
    }

    #[test]
    fn group_count_renders_as_table_row() {
        let line = GroupCount {
            group: FieldValue::Text("Query planning".to_string()),
            total: 2,
        };
        assert_eq!(line.to_string(), "|Query planning|2|");
    }
}
