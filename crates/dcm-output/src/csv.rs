//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `choices.csv`
//! - `choice_shares.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::ChoiceWriter;
use crate::{ChoiceRow, OutputResult, ShareRow};

/// Writes scheduled choices to two CSV files.
pub struct CsvWriter {
    choices:  Writer<File>,
    shares:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut choices = Writer::from_path(dir.join("choices.csv"))?;
        choices.write_record(["agent_id", "segment", "tdd", "start", "end", "duration"])?;

        let mut shares = Writer::from_path(dir.join("choice_shares.csv"))?;
        shares.write_record(["model", "alt_id", "start", "end", "count", "share"])?;

        Ok(Self { choices, shares, finished: false })
    }
}

impl ChoiceWriter for CsvWriter {
    fn write_choices(&mut self, rows: &[ChoiceRow]) -> OutputResult<()> {
        for row in rows {
            self.choices.write_record(&[
                row.agent_id.to_string(),
                row.segment.clone(),
                row.tdd.to_string(),
                row.start.to_string(),
                row.end.to_string(),
                row.duration.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, rows: &[ShareRow]) -> OutputResult<()> {
        for row in rows {
            self.shares.write_record(&[
                row.model.clone(),
                row.alt_id.to_string(),
                row.start.to_string(),
                row.end.to_string(),
                row.count.to_string(),
                row.share.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.choices.flush()?;
        self.shares.flush()?;
        Ok(())
    }
}
