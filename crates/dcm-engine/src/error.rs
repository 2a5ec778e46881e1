use dcm_core::{AgentId, ChunkId, CoreError};
use dcm_expr::ExprError;
use dcm_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("specification row {row} ({expression:?}): {source}")]
    Expression {
        row:        usize,
        expression: String,
        #[source]
        source:     ExprError,
    },

    #[error("degenerate utilities for agent {agent}: {reason}")]
    DegenerateUtilities { agent: AgentId, reason: String },

    #[error("alternative set is empty")]
    NoAlternatives,

    #[error("{what} length {got} does not match {expected}")]
    Shape {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("chunk {chunk} holds {rows} rows, more than the configured chunk size {limit}")]
    ChunkTooLarge { chunk: ChunkId, rows: usize, limit: usize },

    #[error("{missing} agent(s) received no choice")]
    IncompleteResult { missing: usize },

    #[error("duplicate agent id {0} in choice result")]
    DuplicateAgent(AgentId),

    #[error("thread pool error: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> EngineResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(EngineError::Shape { what, expected, got })
    }
}
