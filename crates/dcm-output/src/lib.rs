//! `dcm-output`: writers for scheduled tour choices.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                 |
//! |-----------|-------------|-----------------------------------------------|
//! | *(none)*  | CSV         | `choices.csv`, `choice_shares.csv`            |
//! | `sqlite`  | SQLite      | `output.db`                                   |
//! | `parquet` | Parquet     | `choices.parquet`, `choice_shares.parquet`    |
//!
//! All backends implement [`ChoiceWriter`].  [`write_schedule`] drives any of
//! them from a scheduled tour table and its passes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dcm_output::{CsvWriter, write_schedule};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! write_schedule(&mut writer, &tours, scheduler.columns(), &passes)?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{ChoiceRow, ShareRow};
pub use writer::{ChoiceWriter, write_schedule};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetWriter;
