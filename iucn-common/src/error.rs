//! Common error types for the IUCN importer

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for importer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the importer crates
///
/// `NotFound` and `Integrity` replace row-count assertions: a statement that
/// must touch exactly one row reports which way it missed.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A statement or lookup that must match one row matched none
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate key, or a statement that matched more than one row
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Required input file is absent
    #[error("Missing input file: {}", .0.display())]
    MissingInput(PathBuf),

    /// Malformed input row or unparseable identifier
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Map an insert failure, turning unique-constraint violations into `Integrity`
    pub fn from_insert(err: sqlx::Error, what: impl std::fmt::Display) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Error::Integrity(format!("duplicate {}: {}", what, db_err.message()))
            }
            other => Error::Database(other),
        }
    }
}

/// Check that a statement affected exactly one row
pub fn expect_single_row(rows_affected: u64, what: impl std::fmt::Display) -> Result<()> {
    match rows_affected {
        1 => Ok(()),
        0 => Err(Error::NotFound(what.to_string())),
        n => Err(Error::Integrity(format!("{} affected {} rows", what, n))),
    }
}
