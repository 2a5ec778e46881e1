//! `dcm-spec`: the two read-only inputs every choice model shares.
//!
//! # Crate layout
//!
//! | Module           | Contents                                               |
//! |------------------|--------------------------------------------------------|
//! | [`alternatives`] | `AlternativeSet`, `TimeWindow`                         |
//! | [`spec`]         | `Specification`, `SpecRow`                             |
//! | [`loader`]       | `load_spec_csv`, `load_alternatives_csv` (+ `_reader`) |
//! | [`error`]        | `SpecError`, `SpecResult<T>`                           |
//!
//! Both inputs are loaded once, before any chunk runs, and are never mutated
//! afterwards; the engine shares them across chunks (and threads) by
//! reference.

pub mod alternatives;
pub mod error;
pub mod loader;
pub mod spec;


pub use alternatives::{AlternativeSet, TimeWindow};
pub use error::{SpecError, SpecResult};
pub use loader::{load_alternatives_csv, load_alternatives_reader, load_spec_csv, load_spec_reader};
pub use spec::{SpecRow, Specification};
