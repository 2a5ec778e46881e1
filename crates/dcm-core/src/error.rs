//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised by `dcm-core` (configuration validation, column access,
/// chunk assignment).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("column {name:?} has length {got}, expected {expected}")]
    ColumnLength {
        name:     String,
        expected: usize,
        got:      usize,
    },

    #[error("row {row} with chunk size {chunk_size} overflows the chunk id range")]
    ChunkOverflow { row: usize, chunk_size: usize },
}

/// Shorthand result type for `dcm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
