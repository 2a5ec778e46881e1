//! `dcm-agent`: columnar storage for the agents a choice model runs over.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`table`]   | `AgentTable` (ids, segment labels, chunk ids, columns)     |
//! | [`builder`] | `AgentTableBuilder` (validated construction)               |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                             |
//!
//! An agent is one choice occasion (usually a tour).  Tables are built once
//! by the caller from already-merged population data; the engine only reads
//! them.  Results are written back as new columns with
//! [`AgentTable::set_column`].

pub mod builder;
pub mod error;
pub mod table;

#[cfg(test)]
mod tests;

pub use builder::AgentTableBuilder;
pub use error::{AgentError, AgentResult};
pub use table::AgentTable;
