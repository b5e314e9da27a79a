//! Error types for the eop module
//!
//! Every failure of a series load maps onto one of these variants. Query
//! degradation is not an error; it is reported through [`super::EopFlags`].

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while reading or validating an EOP series
#[derive(Error, Debug)]
pub enum EopError {
    /// Error when a file I/O operation fails
    #[error("File I/O error on {path:?}: {source}")]
    FileError {
        /// The path of the file that caused the error
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A row carries text the reader cannot interpret
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the source file
        line: usize,
        /// What was wrong with the row
        message: String,
    },

    /// The source holds no usable rows at all
    #[error("EOP source contains no data rows")]
    Empty,

    /// Rows parsed but do not form a valid series
    #[error("Malformed EOP series: {0}")]
    Malformed(String),
}

/// Result type for eop operations
pub type Result<T> = std::result::Result<T, EopError>;

/// Helper function to convert a std::io::Error to EopError
pub fn io_err(path: impl Into<PathBuf>, err: std::io::Error) -> EopError {
    EopError::FileError {
        path: path.into(),
        source: err,
    }
}
