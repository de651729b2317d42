//! Error types for diff operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Row {position} has {left} fields in table 1 but {right} fields in table 2")]
    ArityMismatch {
        position: usize,
        left: usize,
        right: usize,
    },

    #[error("Field '{name}' not found in table {table}")]
    FieldNotFound { name: String, table: usize },

    #[error("Multiple fields found in table {table} named '{name}'. Use field numbers to disambiguate")]
    AmbiguousField { name: String, table: usize },

    #[error("Unable to parse field number '{0}'")]
    InvalidFieldNumber(String),

    #[error("Field '{name}' is at position {left} in table 1 but at position {right} in table 2")]
    FieldPositionMismatch {
        name: String,
        left: usize,
        right: usize,
    },

    #[error("Field mapping conflict: position {position} is already paired with {existing}, cannot pair it with {requested}")]
    ConflictingMapping {
        position: usize,
        existing: usize,
        requested: usize,
    },

    #[error("Rows of this table pair have already been consumed")]
    RowsConsumed,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiffError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// True for errors raised before any comparison runs
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::FieldNotFound { .. }
                | Self::AmbiguousField { .. }
                | Self::InvalidFieldNumber(_)
                | Self::FieldPositionMismatch { .. }
                | Self::ConflictingMapping { .. }
        )
    }
}
