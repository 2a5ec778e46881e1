use dcm_core::CoreError;
use dcm_expr::ExprError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("specification row {row} ({expression:?}): {source}")]
    Expression {
        row:        usize,
        expression: String,
        #[source]
        source:     ExprError,
    },

    #[error("unknown segment {0:?}: no coefficient column with that name")]
    UnknownSegment(String),

    #[error("missing required column {0:?}")]
    MissingColumn(String),

    #[error("specification configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpecResult<T> = Result<T, SpecError>;
