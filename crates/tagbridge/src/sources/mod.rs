//! Loaders for the auxiliary mapping-source files.
//!
//! These are thin adapters that read files into the in-memory structures the
//! engine consumes. They are independent of the conversion pass.

mod context_csv;
mod error;
mod mapping_file;
mod query_sql;

pub use context_csv::{load_context_file, parse_context_csv};
pub use error::LoadError;
pub use mapping_file::{NestedPath, SchemaMapping, load_mapping_file, parse_mapping_json};
pub use query_sql::{load_query_file, parse_query_sql};
