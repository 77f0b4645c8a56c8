use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// PipelineError – named failure conditions of a run
// ---------------------------------------------------------------------------

/// Failures a run can surface to the caller.
///
/// Rows are reported zero-based, in load order.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Data file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("required column '{field}' is missing from the dataset")]
    MissingField { field: String },

    #[error("row {row}: column '{field}' has no value")]
    MissingValue { field: String, row: usize },

    #[error("row {row}: column '{field}' is not numeric: '{value}'")]
    NonNumericValue {
        field: String,
        row: usize,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("row {row}: initial pollutant concentration is zero")]
    DivisionByZero { row: usize },

    #[error("column '{column}' has {actual} values but the dataset has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
