//! Core contracts and helpers for Biblio.
//!
//! This crate defines the closed table registry for the bibliographic schema,
//! catalog column metadata, field values, and utilities shared across the
//! store, generator and CLI crates.

pub mod error;
pub mod redaction;
pub mod registry;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use registry::{EntityDef, FieldDef, ForeignKeyDef, TableId};
pub use schema::{Column, IdentityGeneration};
pub use types::{FieldKind, FieldValue};

/// Namespace the bibliographic tables live in unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "public";
