//! Data model for tabular data representation

mod schema;
mod selector;
mod table;

pub use schema::{Schema, SchemaOrigin};
pub use selector::FieldSelector;
pub use table::{Row, RowSource, Table};
