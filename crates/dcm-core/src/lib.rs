//! `dcm-core`: foundational types for the `rust_dcm` choice engine.
//!
//! This crate is a dependency of every other `dcm-*` crate.  It has no
//! `dcm-*` dependencies and minimal external ones (`rand`, `rustc-hash` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `AgentId`, `AltId`, `SegmentId`, `ChunkId`              |
//! | [`chunk`]     | `chunk_of`: pure row-number → chunk mapping            |
//! | [`column`]    | `Column`, `Categorical`: typed attribute columns       |
//! | [`rng`]       | `ChoiceRng`, `DrawStream`: per-agent uniform draws     |
//! | [`config`]    | `RunConfig`, `SimulationContext`                        |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `RunConfig`.     |

pub mod chunk;
pub mod column;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use chunk::chunk_of;
pub use column::{Categorical, Column, Scalar};
pub use config::{DEFAULT_CHANNEL, RunConfig, SimulationContext};
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, AltId, ChunkId, SegmentId};
pub use rng::{ChoiceRng, DrawStream};
