//! `dcm-schedule`: tour departure-and-duration scheduling.
//!
//! The thin layer between the choice engine and a tour table: pick the
//! tours of one segment, run that segment's model, and persist the chosen
//! windows as columns.  Which segments run, and in which order, is up to the
//! caller.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`scheduler`] | `TourScheduler`, `ScheduleColumns`, `SchedulePass`     |
//! | [`summary`]   | `ChoiceSummary`, `AltShare`                            |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                   |
//!
//! # Usage
//!
//! ```rust,ignore
//! let scheduler = TourScheduler::new(&alternatives, config)
//!     .with_model("work", work_spec)?
//!     .with_model("school", school_spec)?;
//!
//! scheduler.schedule(&mut tours, "work")?;
//! scheduler.schedule(&mut tours, "school")?;
//! ```

pub mod error;
pub mod scheduler;
pub mod summary;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use scheduler::{ScheduleColumns, SchedulePass, TourScheduler};
pub use summary::{AltShare, ChoiceSummary};
