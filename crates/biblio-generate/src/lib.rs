//! Synthetic row generation for the bibliographic tables.
//!
//! Reads a table's columns from the catalog, plans a value rule per column
//! (see [`policy`]) and inserts rows one statement at a time inside a single
//! transaction.

pub mod engine;
pub mod errors;
pub mod model;
pub mod policy;
pub mod postgres;
pub mod target;

pub use engine::{GenerationEngine, generate_rows};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport};
pub use target::{GeneratedCell, GenerationTarget, InMemoryTarget};
