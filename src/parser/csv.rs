//! CSV file parser

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::config::Config;
use crate::error::DiffError;
use crate::model::{Row, RowSource, Table};

use super::Parser;

/// Parser for delimited text files
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser {
    delimiter: Option<u8>,
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }

    /// Delimiter for `path`: the configured one, else tab for `.tsv`/`.tab`,
    /// else comma
    pub fn delimiter_for(&self, path: &Path) -> u8 {
        if let Some(d) = self.delimiter {
            return d;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "tsv" | "tab" => b'\t',
            _ => b',',
        }
    }

    /// Stream records from any reader, one row at a time
    pub fn records<R: Read + 'static>(reader: R, delimiter: u8) -> RowSource {
        let csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        Box::new(csv_reader.into_records().map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect::<Row>())
                .map_err(DiffError::from)
        }))
    }
}

impl Parser for CsvParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let delimiter = self.delimiter_for(path);
        debug!(
            "Reading {} with delimiter {:?}",
            path.display(),
            delimiter as char
        );

        let rows = Self::records(BufReader::new(file), delimiter);
        let table = Table::from_source(rows, None, config.label_first_row)
            .with_context(|| format!("Failed to read first row of {}", path.display()))?;
        debug!(
            "{}: {} fields ({})",
            path.display(),
            table.schema().len(),
            table.schema().origin()
        );
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "tab" | "txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn read(data: &str, delimiter: u8) -> Vec<Vec<String>> {
        CsvParser::records(Cursor::new(data.to_string().into_bytes()), delimiter)
            .collect::<crate::error::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_records_keep_raw_values() {
        let rows = read("a, b ,\"c,d\"\n1,,3\n", b',');
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), " b ".into(), "c,d".into()],
                vec!["1".to_string(), "".into(), "3".into()],
            ]
        );
    }

    #[test]
    fn test_ragged_rows_are_passed_through() {
        let rows = read("a,b\n1\n", b',');
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_delimiter_for_extension() {
        let parser = CsvParser::new();
        assert_eq!(parser.delimiter_for(Path::new("x.tsv")), b'\t');
        assert_eq!(parser.delimiter_for(Path::new("x.csv")), b',');
        assert_eq!(
            CsvParser::with_delimiter(b';').delimiter_for(Path::new("x.tsv")),
            b';'
        );
    }

    #[test]
    fn test_parse_labelled_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "id,name\n1,ann\n2,bob\n").unwrap();

        let config = Config::default().with_label_first_row(true);
        let mut table = CsvParser::new().parse(file.path(), &config).unwrap();
        assert_eq!(table.fields(), &["id", "name"]);
        let rows: Vec<_> = table.take_rows().unwrap().collect::<crate::error::Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = CsvParser::new()
            .parse(Path::new("/nonexistent/file.csv"), &Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
