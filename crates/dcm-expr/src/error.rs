use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExprError {
    #[error("syntax error at offset {pos}: {msg}")]
    Syntax { pos: usize, msg: String },

    #[error("unknown function {0:?}")]
    UnknownFunction(String),

    #[error("function {name} takes {expected} argument(s), got {got}")]
    Arity {
        name:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("unknown attribute {0:?}: not an agent or alternative column")]
    UnknownAttribute(String),

    #[error("type mismatch in {op}: cannot apply to {left} and {right}")]
    TypeMismatch {
        op:    &'static str,
        left:  &'static str,
        right: &'static str,
    },
}

pub type ExprResult<T> = Result<T, ExprError>;
