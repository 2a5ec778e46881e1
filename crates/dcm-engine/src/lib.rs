//! `dcm-engine`: the vectorized discrete-choice simulation engine.
//!
//! # One run
//!
//! ```text
//! for chunk in agents.chunk_rows():          (ascending ChunkId)
//!   ① Gather  : only the agent columns the specification references.
//!   ② Utility : rows × alternatives expression evaluations, each
//!                vectorized over the chunk's agents.
//!   ③ Logit   : exp(u − max) / Σ per agent; degenerate rows are fatal.
//!   ④ Draw    : one uniform per agent from (seed, agent, model, channel).
//!   ⑤ Choose  : first alternative whose cumulative probability > draw.
//! scatter every chunk's choices back to table row order
//! ```
//!
//! Draws never depend on the chunk an agent lands in, so any chunking of
//! the same table yields the same choices.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`utility`]   | `UtilityMatrix`, `ChunkColumns`, `EvalScope`, `evaluate_utilities` |
//! | [`logit`]     | `ProbabilityMatrix`, `utils_to_probs`, `make_choices`      |
//! | [`runner`]    | `ChoiceRunner`                                             |
//! | [`result`]    | `ChoiceResult`                                             |
//! | [`observer`]  | `RunObserver`, `NoopObserver`, `TraceCollector`, `AgentTrace` |
//! | [`error`]     | `EngineError`, `EngineResult<T>`                           |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs chunks on Rayon's thread pool.                    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let alternatives = load_alternatives_csv(Path::new("tdd_alts.csv"))?;
//! let spec = load_spec_csv(Path::new("tour_departure_and_duration_work.csv"))?;
//! let ctx = config.context("tdd_work");
//!
//! let result = ChoiceRunner::from_config(&config, &alternatives, &spec)?
//!     .run(&work_tours, &ctx)?;
//! ```

pub mod error;
pub mod logit;
pub mod observer;
pub mod result;
pub mod runner;
pub mod utility;


pub use error::{EngineError, EngineResult};
pub use logit::{ProbabilityMatrix, choose, make_choices, utils_to_probs};
pub use observer::{AgentTrace, NoopObserver, RunObserver, TraceCollector};
pub use result::ChoiceResult;
pub use runner::ChoiceRunner;
pub use utility::{ChunkColumns, EvalScope, UtilityMatrix, evaluate_utilities};
