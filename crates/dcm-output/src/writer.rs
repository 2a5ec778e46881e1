//! The `ChoiceWriter` trait implemented by all backend writers.

use dcm_agent::AgentTable;
use dcm_schedule::{ScheduleColumns, SchedulePass};

use crate::{ChoiceRow, OutputResult, ShareRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
pub trait ChoiceWriter {
    /// Write a batch of scheduled tours.
    fn write_choices(&mut self, rows: &[ChoiceRow]) -> OutputResult<()>;

    /// Write the per-alternative shares of one or more passes.
    fn write_summary(&mut self, rows: &[ShareRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Write every scheduled tour of `tours` and the shares of every pass, then
/// finish the writer.
pub fn write_schedule<W: ChoiceWriter>(
    writer:  &mut W,
    tours:   &AgentTable,
    columns: &ScheduleColumns,
    passes:  &[SchedulePass],
) -> OutputResult<()> {
    writer.write_choices(&ChoiceRow::from_tours(tours, columns)?)?;
    for pass in passes {
        writer.write_summary(&ShareRow::from_pass(pass))?;
    }
    writer.finish()
}
