//! csvdiff - Positional diff for tabular data
//!
//! Compares two tables (a schema plus a stream of rows) and reports field
//! level changes, then, when the schemas agree, row level changes with the
//! individual values that differ.

pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

pub use config::Config;
pub use diff::{compute_diff, DiffEngine, DiffOptions, DiffResult};
pub use error::{DiffError, Result};
pub use model::Table;
