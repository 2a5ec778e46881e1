use dcm_agent::AgentError;
use dcm_core::AltId;
use dcm_engine::EngineError;
use dcm_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("no scheduling model registered for segment {0:?}")]
    NoModel(String),

    #[error("segment {0:?} registered twice")]
    DuplicateModel(String),

    #[error("column {name:?} is {kind}; scheduled times must be numeric")]
    ColumnType { name: String, kind: &'static str },

    #[error("chosen {0} is not in the alternative set")]
    UnknownAlternative(AltId),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
