//! Error types for loading the supply-chain dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the dataset. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input (bad quoting, ragged rows, invalid UTF-8).
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File has no header row.
    #[error("CSV file has no header row: {path}")]
    EmptyHeader { path: PathBuf },

    /// A required column is absent from the header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A present cell could not be converted to the column's type.
    #[error("invalid row at line {line} in {path}: {message}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// A numeric value outside its allowed range.
    #[error("value {value} for column '{column}' at line {line} in {path} is out of range")]
    OutOfRange {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: f64,
    },
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
