//! Error types for the data-loader crate.
//!
//! Only the loading side of the crate can fail. Once a `CatalogIndex`
//! exists, every query on it answers with `Option` or an empty slice.

use thiserror::Error;

/// Errors that can occur while reading and cleaning the catalog tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// One of titles.dat / ratings.dat / users.dat is missing
    #[error("Catalog table not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading catalog table: {0}")]
    IoError(#[from] std::io::Error),

    /// A `::`-delimited row had the wrong shape or an unparsable field
    #[error("{file}:{line}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A value outside its allowed range, e.g. a rating off the scale
    #[error("Invalid {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A header row is missing a column the parser cannot do without
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// Cross-table consistency check failed
    #[error("Catalog validation failed: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
