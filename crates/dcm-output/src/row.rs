//! Plain data row types written by output backends.

use dcm_agent::AgentTable;
use dcm_schedule::{ScheduleColumns, SchedulePass};

use crate::{OutputError, OutputResult};

/// The scheduled window of one tour.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceRow {
    pub agent_id: u64,
    pub segment:  String,
    /// Chosen alternative id.
    pub tdd:      u32,
    pub start:    f64,
    pub end:      f64,
    pub duration: f64,
}

/// Share of one alternative in one scheduling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRow {
    pub model:  String,
    pub alt_id: u32,
    pub start:  f64,
    pub end:    f64,
    pub count:  u64,
    pub share:  f64,
}

impl ChoiceRow {
    /// One row per scheduled tour, in table order.  Tours with no choice yet
    /// (NaN `tdd`) are skipped.
    pub fn from_tours(tours: &AgentTable, columns: &ScheduleColumns) -> OutputResult<Vec<ChoiceRow>> {
        let tdd = numeric(tours, &columns.tdd)?;
        let start = numeric(tours, &columns.start)?;
        let end = numeric(tours, &columns.end)?;
        let duration = numeric(tours, &columns.duration)?;

        Ok((0..tours.len())
            .filter(|&row| !tdd[row].is_nan())
            .map(|row| ChoiceRow {
                agent_id: tours.id(row).0,
                segment:  tours.segment_label(row).to_owned(),
                tdd:      tdd[row] as u32,
                start:    start[row],
                end:      end[row],
                duration: duration[row],
            })
            .collect())
    }
}

impl ShareRow {
    /// Every alternative of `pass`, chosen or not.
    pub fn from_pass(pass: &SchedulePass) -> Vec<ShareRow> {
        pass.summary
            .shares
            .iter()
            .map(|s| ShareRow {
                model:  pass.model.clone(),
                alt_id: s.alt.0,
                start:  s.window.start,
                end:    s.window.end,
                count:  s.count as u64,
                share:  s.share,
            })
            .collect()
    }
}

fn numeric<'t>(tours: &'t AgentTable, name: &str) -> OutputResult<&'t [f64]> {
    tours
        .column(name)
        .and_then(|c| c.as_num())
        .ok_or_else(|| OutputError::MissingColumn(name.to_owned()))
}
