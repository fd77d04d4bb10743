use biblio_core::{Column, IdentityGeneration};

use crate::options::IntrospectOptions;

use super::queries::{RawColumn, RawTable};

pub fn map_tables(raw: Vec<RawTable>, opts: &IntrospectOptions) -> Vec<String> {
    let mut tables: Vec<String> = raw
        .into_iter()
        .filter(|table| match table.table_type.as_str() {
            "BASE TABLE" => true,
            "VIEW" => opts.include_views,
            _ => false,
        })
        .map(|table| table.name)
        .collect();
    tables.sort();
    tables
}

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<Column> {
    let mut columns: Vec<Column> = raw
        .into_iter()
        .map(|col| Column {
            ordinal_position: col.ordinal_position,
            name: col.name,
            data_type: col.data_type,
            is_nullable: col.is_nullable,
            default: col.default,
            identity: identity_from_text(col.identity_generation.as_deref()),
        })
        .collect();
    columns.sort_by_key(|col| col.ordinal_position);
    columns
}

/// Map textual identity generation to the enum used in the model.
fn identity_from_text(identity: Option<&str>) -> Option<IdentityGeneration> {
    identity.and_then(|value| match value {
        "ALWAYS" => Some(IdentityGeneration::Always),
        "BY DEFAULT" => Some(IdentityGeneration::ByDefault),
        _ => None,
    })
}
