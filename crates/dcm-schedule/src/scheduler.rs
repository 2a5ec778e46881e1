//! `TourScheduler`: assign departure/arrival windows to one tour segment at
//! a time.
//!
//! A pass is glue around the engine:
//!
//! 1. select the tours whose segment label matches,
//! 2. run the segment's model against the shared alternative set, chunked
//!    by the tours' chunk ids (a single-chunk selection larger than the
//!    configured chunk size is split by row number first),
//! 3. expand each chosen alternative to its window,
//! 4. write `tdd`, `start`, `end` and `duration` back onto the tour table.
//!
//! Rows of other segments are left as they are (NaN until their own pass),
//! so passes can run in whatever order the caller decides.

use dcm_agent::AgentTable;
use dcm_core::{Column, RunConfig};
use dcm_engine::{ChoiceResult, ChoiceRunner, NoopObserver, RunObserver};
use dcm_spec::{AlternativeSet, Specification};
use tracing::debug;

use crate::{ChoiceSummary, ScheduleError, ScheduleResult};

// ── Column names ──────────────────────────────────────────────────────────────

/// Names of the result columns written onto the tour table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleColumns {
    /// Chosen alternative id.
    pub tdd:      String,
    pub start:    String,
    pub end:      String,
    pub duration: String,
}

impl Default for ScheduleColumns {
    fn default() -> Self {
        Self {
            tdd:      "tdd".into(),
            start:    "start".into(),
            end:      "end".into(),
            duration: "duration".into(),
        }
    }
}

// ── Models ────────────────────────────────────────────────────────────────────

/// One registered segment model.
struct SegmentModel {
    segment: String,
    model:   String,
    spec:    Specification,
}

/// Outcome of one [`TourScheduler::schedule`] call.
#[derive(Clone, Debug)]
pub struct SchedulePass {
    pub segment: String,
    pub model:   String,
    pub result:  ChoiceResult,
    pub summary: ChoiceSummary,
}

// ── TourScheduler ─────────────────────────────────────────────────────────────

/// Runs per-segment departure/duration models over a tour table.
pub struct TourScheduler<'a> {
    alternatives: &'a AlternativeSet,
    config:       RunConfig,
    columns:      ScheduleColumns,
    models:       Vec<SegmentModel>,
}

impl<'a> TourScheduler<'a> {
    pub fn new(alternatives: &'a AlternativeSet, config: RunConfig) -> Self {
        Self {
            alternatives,
            config,
            columns: ScheduleColumns::default(),
            models: Vec::new(),
        }
    }

    /// Register the specification used for `segment`.  The model name,
    /// which keys the random draws, is `tdd_<segment>`.
    pub fn with_model(mut self, segment: impl Into<String>, spec: Specification) -> ScheduleResult<Self> {
        let segment = segment.into();
        if self.models.iter().any(|m| m.segment == segment) {
            return Err(ScheduleError::DuplicateModel(segment));
        }
        spec.segment_index(&segment)?;
        self.models.push(SegmentModel { model: format!("tdd_{segment}"), segment, spec });
        Ok(self)
    }

    pub fn with_columns(mut self, columns: ScheduleColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn columns(&self) -> &ScheduleColumns {
        &self.columns
    }

    pub fn alternatives(&self) -> &AlternativeSet {
        self.alternatives
    }

    /// Registered segments, in registration order.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.models.iter().map(|m| m.segment.as_str())
    }

    pub fn schedule(&self, tours: &mut AgentTable, segment: &str) -> ScheduleResult<SchedulePass> {
        self.schedule_observed(tours, segment, &mut NoopObserver)
    }

    pub fn schedule_observed<O: RunObserver>(
        &self,
        tours:    &mut AgentTable,
        segment:  &str,
        observer: &mut O,
    ) -> ScheduleResult<SchedulePass> {
        let model = self
            .models
            .iter()
            .find(|m| m.segment == segment)
            .ok_or_else(|| ScheduleError::NoModel(segment.to_owned()))?;

        let rows = tours.segment_rows(segment);
        let mut subset = tours.take(&rows)?;
        let limit = self.config.chunk_size;
        if limit > 0 && subset.chunk_count() == 1 && subset.len() > limit {
            debug!(segment, tours = subset.len(), chunk_size = limit, "chunking unchunked tours");
            subset.rechunk(limit)?;
        }

        let ctx = self.config.context(model.model.as_str());
        let result = ChoiceRunner::from_config(&self.config, self.alternatives, &model.spec)?
            .run_observed(&subset, &ctx, observer)?;

        self.write_back(tours, &rows, &result)?;

        let summary = ChoiceSummary::from_choices(&result, self.alternatives)?;
        summary.log(&model.model, segment);

        Ok(SchedulePass {
            segment: segment.to_owned(),
            model: model.model.clone(),
            result,
            summary,
        })
    }

    /// Expand choices to windows and store them at `rows` of `tours`.
    fn write_back(&self, tours: &mut AgentTable, rows: &[usize], result: &ChoiceResult) -> ScheduleResult<()> {
        let c = &self.columns;
        let mut tdd = numeric_or_nan(tours, &c.tdd)?;
        let mut start = numeric_or_nan(tours, &c.start)?;
        let mut end = numeric_or_nan(tours, &c.end)?;
        let mut duration = numeric_or_nan(tours, &c.duration)?;

        for (&row, &alt) in rows.iter().zip(result.choices()) {
            let window = self
                .alternatives
                .window(alt)
                .ok_or(ScheduleError::UnknownAlternative(alt))?;
            tdd[row] = f64::from(alt.0);
            start[row] = window.start;
            end[row] = window.end;
            duration[row] = window.duration;
        }

        tours.set_column(c.tdd.as_str(), Column::Num(tdd))?;
        tours.set_column(c.start.as_str(), Column::Num(start))?;
        tours.set_column(c.end.as_str(), Column::Num(end))?;
        tours.set_column(c.duration.as_str(), Column::Num(duration))?;
        Ok(())
    }
}

/// Current values of a numeric result column, or all-NaN if it is absent.
fn numeric_or_nan(tours: &AgentTable, name: &str) -> ScheduleResult<Vec<f64>> {
    match tours.column(name) {
        None => Ok(vec![f64::NAN; tours.len()]),
        Some(Column::Num(values)) => Ok(values.clone()),
        Some(other) => Err(ScheduleError::ColumnType { name: name.to_owned(), kind: other.kind() }),
    }
}
