//! Configuration handling for csvdiff

use std::path::PathBuf;

use crate::diff::{DiffOptions, FieldFilter};
use crate::error::{DiffError, Result};
use crate::model::{FieldSelector, Schema};

/// Output format for diff results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Unified,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "unified" => Ok(OutputFormat::Unified),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Which columns take part in the comparison, before resolution against
/// the tables' schemas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldSelection {
    #[default]
    All,
    Skip(Vec<FieldSelector>),
    Only(Vec<FieldSelector>),
}

impl FieldSelection {
    /// Combine a skip list and an only list; at most one may be non-empty
    pub fn from_lists(skip: Vec<FieldSelector>, only: Vec<FieldSelector>) -> Result<Self> {
        match (skip.is_empty(), only.is_empty()) {
            (true, true) => Ok(FieldSelection::All),
            (false, true) => Ok(FieldSelection::Skip(skip)),
            (true, false) => Ok(FieldSelection::Only(only)),
            (false, false) => Err(DiffError::config(
                "skip-fields and only-fields cannot be used together",
            )),
        }
    }

    /// Resolve labels and numbers to a positional filter
    pub fn resolve(&self, schema_a: &Schema, schema_b: &Schema) -> Result<FieldFilter> {
        Ok(match self {
            FieldSelection::All => FieldFilter::None,
            FieldSelection::Skip(list) => {
                FieldFilter::Skip(FieldSelector::resolve_all(list, schema_a, schema_b)?)
            }
            FieldSelection::Only(list) => {
                FieldFilter::Only(FieldSelector::resolve_all(list, schema_a, schema_b)?)
            }
        })
    }
}

/// Configuration for diff operations
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the old/original file
    pub old_file: PathBuf,
    /// Path to the new file
    pub new_file: PathBuf,
    /// First row of each file holds field labels
    pub label_first_row: bool,
    /// Ignore case when comparing field names and values
    pub ignore_case: bool,
    /// Match columns by label instead of position
    pub ignore_order: bool,
    /// Columns to skip or restrict to
    pub fields: FieldSelection,
    /// Report detail level
    pub verbosity: u8,
    /// Output format
    pub output_format: OutputFormat,
    /// Field delimiter, guessed from the file extension when unset
    pub delimiter: Option<u8>,
    /// Only show statistics, not detailed changes
    pub stats_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            old_file: PathBuf::new(),
            new_file: PathBuf::new(),
            label_first_row: false,
            ignore_case: false,
            ignore_order: false,
            fields: FieldSelection::All,
            verbosity: 2,
            output_format: OutputFormat::default(),
            delimiter: None,
            stats_only: false,
        }
    }
}

impl Config {
    /// Create a new Config with file paths
    pub fn new(old_file: PathBuf, new_file: PathBuf) -> Self {
        Self {
            old_file,
            new_file,
            ..Default::default()
        }
    }

    /// Treat the first row as field labels
    pub fn with_label_first_row(mut self, label: bool) -> Self {
        self.label_first_row = label;
        self
    }

    /// Enable case-insensitive comparison
    pub fn with_ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = ignore;
        self
    }

    /// Match columns by label
    pub fn with_ignore_order(mut self, ignore: bool) -> Self {
        self.ignore_order = ignore;
        self
    }

    /// Set the column selection
    pub fn with_fields(mut self, fields: FieldSelection) -> Self {
        self.fields = fields;
        self
    }

    /// Set verbosity
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Enable stats-only mode
    pub fn with_stats_only(mut self, stats_only: bool) -> Self {
        self.stats_only = stats_only;
        self
    }

    /// Check option combinations that can be rejected before reading data
    pub fn validate(&self) -> Result<()> {
        if self.ignore_order && !self.label_first_row {
            return Err(DiffError::config(
                "--ignore-order only makes sense for labeled tables",
            ));
        }
        Ok(())
    }

    /// Engine options for a pair of schemas
    pub fn diff_options(&self, schema_a: &Schema, schema_b: &Schema) -> Result<DiffOptions> {
        self.validate()?;
        Ok(DiffOptions {
            filter: self.fields.resolve(schema_a, schema_b)?,
            ignore_case: self.ignore_case,
            ignore_order: self.ignore_order,
            verbosity: self.verbosity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Schema {
        Schema::from_labels(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_skip_and_only_conflict() {
        let skip = vec![FieldSelector::Index(0)];
        let only = vec![FieldSelector::Index(1)];
        let err = FieldSelection::from_lists(skip.clone(), only).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            FieldSelection::from_lists(skip.clone(), Vec::new()).unwrap(),
            FieldSelection::Skip(skip)
        );
        assert_eq!(
            FieldSelection::from_lists(Vec::new(), Vec::new()).unwrap(),
            FieldSelection::All
        );
    }

    #[test]
    fn test_ignore_order_requires_labels() {
        let config = Config::default().with_ignore_order(true);
        assert!(config.validate().is_err());
        assert!(config.with_label_first_row(true).validate().is_ok());
    }

    #[test]
    fn test_diff_options_resolve_labels() {
        let config = Config::default()
            .with_label_first_row(true)
            .with_fields(FieldSelection::Only(FieldSelector::parse_list("name,@0").unwrap()));
        let options = config
            .diff_options(&labels(&["id", "name", "age"]), &labels(&["id", "name", "age"]))
            .unwrap();
        assert_eq!(options.filter, FieldFilter::only([0, 1]));
        assert_eq!(options.verbosity, 2);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
