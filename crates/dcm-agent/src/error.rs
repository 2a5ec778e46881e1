use dcm_core::{AgentId, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("duplicate agent id {0}")]
    DuplicateAgent(AgentId),

    #[error("agent table has no segment labels")]
    MissingSegments,

    #[error("{what} has {got} entries for {expected} agents")]
    Length {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("too many distinct segment labels ({0})")]
    TooManySegments(usize),

    #[error("duplicate column {0:?}")]
    DuplicateColumn(String),

    #[error("row {row} out of range for {len} agents")]
    RowOutOfRange { row: usize, len: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AgentResult<T> = Result<T, AgentError>;
