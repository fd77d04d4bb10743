use serde::{Deserialize, Serialize};

use crate::types::FieldKind;

/// Identity generation strategy for columns using `GENERATED ... AS IDENTITY`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityGeneration {
    Always,
    ByDefault,
}

/// Column metadata as reported by the database catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub ordinal_position: i32,
    pub name: String,
    /// `information_schema` type name (e.g. `character varying`).
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub identity: Option<IdentityGeneration>,
}

impl Column {
    pub fn kind(&self) -> Option<FieldKind> {
        FieldKind::from_data_type(&self.data_type)
    }

    /// True when the database assigns the value itself (sequence or identity).
    pub fn is_database_assigned(&self) -> bool {
        self.identity.is_some()
            || self
                .default
                .as_deref()
                .is_some_and(|default| default.starts_with("nextval("))
    }
}
