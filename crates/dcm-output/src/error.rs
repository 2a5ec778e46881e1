//! Error types for dcm-output.

use thiserror::Error;

/// Errors that can occur when writing choice output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("tour table has no numeric column {0:?}")]
    MissingColumn(String),

    #[cfg(feature = "sqlite")]
    #[error("agent id {0} does not fit an SQLite INTEGER")]
    IdRange(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
