//! Catalog introspection for the bibliographic tables.

pub mod adapter;
pub mod options;
pub mod postgres;

pub use adapter::Catalog;
pub use options::IntrospectOptions;
pub use postgres::PostgresCatalog;

pub use biblio_core::Column;
