//! `dcm-expr`: the expression language of utility specifications.
//!
//! Each specification row carries a small expression such as
//! `(ptype == 'part_time') * start` or `clip(duration - 8, 0, 10)`.  The text
//! is parsed once into an [`Expr`] operator tree and then evaluated many times
//! (once per alternative per chunk) against a [`Scope`] that resolves names
//! to either a per-agent column or a per-alternative scalar.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`lexer`]   | `Token`, `tokenize`                                      |
//! | [`ast`]     | `Expr`, `BinaryOp`, `UnaryOp`, `Func`                    |
//! | [`parser`]  | `parse`: precedence-climbing recursive descent          |
//! | [`eval`]    | `Scope`, `Attr`, `Value`, `evaluate`                     |
//! | [`error`]   | `ExprError`, `ExprResult<T>`                             |
//!
//! # Vectorization
//!
//! A value is either a scalar (one number or string for every agent) or a
//! vector with one entry per agent row.  Scalars broadcast against vectors, so
//! an expression that only touches alternative attributes costs one scalar
//! computation no matter how many agents are in the chunk.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;


pub use ast::{BinaryOp, Expr, Func, UnaryOp};
pub use error::{ExprError, ExprResult};
pub use eval::{Attr, Scope, Value, evaluate};
pub use parser::parse;
