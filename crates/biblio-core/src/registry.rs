use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::FieldKind;

/// The closed set of tables in the bibliographic schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableId {
    Article,
    Topic,
    TopicArticle,
    Author,
    #[serde(rename = "Article_Author")]
    ArticleAuthor,
}

/// Static column definition of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Declared length for `character varying` columns.
    pub max_len: Option<usize>,
}

/// Foreign key from a column of the entity to a parent table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub parent: TableId,
}

/// Static entity definition resolved from a [`TableId`].
#[derive(Debug, Clone, Copy)]
pub struct EntityDef {
    pub table: TableId,
    pub primary_key: &'static str,
    /// Ordered columns, primary key first.
    pub fields: &'static [FieldDef],
    pub foreign_keys: &'static [ForeignKeyDef],
}

const fn int(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::Integer,
        max_len: None,
    }
}

const fn varchar(name: &'static str, len: usize) -> FieldDef {
    FieldDef {
        name,
        kind: FieldKind::VarChar,
        max_len: Some(len),
    }
}

static ARTICLE: EntityDef = EntityDef {
    table: TableId::Article,
    primary_key: "article_id",
    fields: &[
        int("article_id"),
        varchar("title", 50),
        varchar("annotation", 50),
        varchar("doi", 50),
        varchar("publicationdate", 50),
    ],
    foreign_keys: &[],
};

static TOPIC: EntityDef = EntityDef {
    table: TableId::Topic,
    primary_key: "topic_id",
    fields: &[
        int("topic_id"),
        varchar("topicname", 20),
        varchar("topicgeneralspecification", 20),
    ],
    foreign_keys: &[],
};

static TOPIC_ARTICLE: EntityDef = EntityDef {
    table: TableId::TopicArticle,
    primary_key: "topicarticle_id",
    fields: &[int("topicarticle_id"), int("article_id"), int("topic_id")],
    foreign_keys: &[
        ForeignKeyDef {
            column: "article_id",
            parent: TableId::Article,
        },
        ForeignKeyDef {
            column: "topic_id",
            parent: TableId::Topic,
        },
    ],
};

static AUTHOR: EntityDef = EntityDef {
    table: TableId::Author,
    primary_key: "author_id",
    fields: &[
        int("author_id"),
        varchar("name", 50),
        varchar("affiliation", 50),
        varchar("email", 50),
    ],
    foreign_keys: &[],
};

static ARTICLE_AUTHOR: EntityDef = EntityDef {
    table: TableId::ArticleAuthor,
    primary_key: "article_author_id",
    fields: &[int("article_author_id"), int("author_id"), int("article_id")],
    foreign_keys: &[
        ForeignKeyDef {
            column: "author_id",
            parent: TableId::Author,
        },
        ForeignKeyDef {
            column: "article_id",
            parent: TableId::Article,
        },
    ],
};

impl TableId {
    pub const ALL: [TableId; 5] = [
        TableId::Article,
        TableId::Topic,
        TableId::TopicArticle,
        TableId::Author,
        TableId::ArticleAuthor,
    ];

    /// Table name as it exists in the database.
    pub fn name(self) -> &'static str {
        match self {
            TableId::Article => "Article",
            TableId::Topic => "Topic",
            TableId::TopicArticle => "TopicArticle",
            TableId::Author => "Author",
            TableId::ArticleAuthor => "Article_Author",
        }
    }

    pub fn entity(self) -> &'static EntityDef {
        match self {
            TableId::Article => &ARTICLE,
            TableId::Topic => &TOPIC,
            TableId::TopicArticle => &TOPIC_ARTICLE,
            TableId::Author => &AUTHOR,
            TableId::ArticleAuthor => &ARTICLE_AUTHOR,
        }
    }

    pub fn primary_key(self) -> &'static str {
        self.entity().primary_key
    }

    /// Resolve the parent table of a `<table>_id` column.
    ///
    /// The prefix is capitalized (`article_id` -> `Article`) and looked up in
    /// the registry.
    pub fn from_fk_column(column: &str) -> Result<TableId> {
        let stem = column
            .strip_suffix("_id")
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| Error::Unsupported(format!("'{column}' is not a key column")))?;
        capitalize(stem).parse()
    }

    /// Foreign key joining `self` and `other`, in either direction.
    ///
    /// Returns `(child, key column)` where the key column exists on both
    /// tables.
    pub fn relationship_with(self, other: TableId) -> Option<(TableId, &'static str)> {
        if let Some(fk) = other
            .entity()
            .foreign_keys
            .iter()
            .find(|fk| fk.parent == self)
        {
            return Some((other, fk.column));
        }
        self.entity()
            .foreign_keys
            .iter()
            .find(|fk| fk.parent == other)
            .map(|fk| (self, fk.column))
    }
}

impl EntityDef {
    pub fn field(&self, column: &str) -> Result<&'static FieldDef> {
        self.fields
            .iter()
            .find(|field| field.name == column)
            .ok_or_else(|| Error::UnknownColumn {
                table: self.table.name().to_string(),
                column: column.to_string(),
            })
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.name)
    }
}

impl FromStr for TableId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if let Some(table) = TableId::ALL.into_iter().find(|table| table.name() == value) {
            return Ok(table);
        }
        TableId::ALL
            .into_iter()
            .find(|table| table.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::UnknownTable(value.to_string()))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_and_case_insensitive_names() {
        assert_eq!("Article_Author".parse::<TableId>().unwrap(), TableId::ArticleAuthor);
        assert_eq!("topicarticle".parse::<TableId>().unwrap(), TableId::TopicArticle);
        assert!(matches!(
            "Publisher".parse::<TableId>(),
            Err(Error::UnknownTable(name)) if name == "Publisher"
        ));
    }

    #[test]
    fn primary_key_follows_lowercased_table_name() {
        for table in TableId::ALL {
            assert_eq!(
                table.primary_key(),
                format!("{}_id", table.name().to_lowercase())
            );
            assert_eq!(table.entity().fields[0].name, table.primary_key());
        }
    }

    #[test]
    fn fk_columns_resolve_to_parent_tables() {
        assert_eq!(TableId::from_fk_column("article_id").unwrap(), TableId::Article);
        assert_eq!(TableId::from_fk_column("topic_id").unwrap(), TableId::Topic);
        assert_eq!(TableId::from_fk_column("author_id").unwrap(), TableId::Author);
        assert!(TableId::from_fk_column("publisher_id").is_err());
        assert!(TableId::from_fk_column("title").is_err());
    }

    #[test]
    fn every_declared_fk_matches_the_column_heuristic() {
        for table in TableId::ALL {
            for fk in table.entity().foreign_keys {
                assert_eq!(TableId::from_fk_column(fk.column).unwrap(), fk.parent);
                assert!(table.entity().field(fk.column).is_ok());
            }
        }
    }

    #[test]
    fn relationship_is_found_from_either_side() {
        assert_eq!(
            TableId::Article.relationship_with(TableId::TopicArticle),
            Some((TableId::TopicArticle, "article_id"))
        );
        assert_eq!(
            TableId::ArticleAuthor.relationship_with(TableId::Author),
            Some((TableId::ArticleAuthor, "author_id"))
        );
        assert_eq!(TableId::Article.relationship_with(TableId::Author), None);
    }

    #[test]
    fn unknown_column_is_reported_with_table() {
        let err = TableId::Topic.entity().field("title").unwrap_err();
        assert_eq!(err.to_string(), "unknown column 'title' in table Topic");
    }
}
