//! Generic CRUD and reporting over the bibliographic tables.
//!
//! Table names arrive as strings, are resolved through the `TableId`
//! registry, and every statement is parameterized. Identifiers spliced into
//! SQL only ever come from the registry or the catalog.

pub mod bind;
pub mod model;
pub mod sql;
pub mod store;

pub use model::{GroupCount, GroupedCountQuery, Record, WriteOutcome};
pub use store::Store;
