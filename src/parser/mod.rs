//! Parser layer turning files into row streams

mod csv;

use std::path::Path;

use anyhow::Result;
use log::warn;

use crate::config::Config;
use crate::model::Table;

pub use self::csv::CsvParser;

/// Trait for parsing tabular data files
pub trait Parser {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Open `path` as a table using the configured delimiter.
///
/// Files with unknown extensions are still read as comma separated text.
pub fn parse_table(path: &Path, config: &Config) -> Result<Table> {
    let parser = match config.delimiter {
        Some(d) => CsvParser::with_delimiter(d),
        None => CsvParser::new(),
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.is_empty() && !parser.supports_extension(ext) {
        warn!(
            "Unrecognised extension '{}' for {}, reading as delimited text",
            ext,
            path.display()
        );
    }

    parser.parse(path, config)
}
