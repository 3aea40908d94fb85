//! Sensor Table Error Types

use thiserror::Error;

/// Errors while reading sensor logs or ground-truth files
#[derive(Debug, Error)]
pub enum TableError {
    /// Underlying file could not be read
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Record has fewer fields than the fixed column layout
    #[error("line {line}: expected {expected} fields, found {found}")]
    ShortRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Field is not a number
    #[error("line {line}: field {column} is not numeric: {value:?}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    /// Engine id or cycle is not a positive integer
    #[error("line {line}: {column} must be a positive integer, got {value}")]
    InvalidIdentifier {
        line: usize,
        column: &'static str,
        value: f64,
    },

    /// Input contained no records at all
    #[error("no records found")]
    Empty,
}
