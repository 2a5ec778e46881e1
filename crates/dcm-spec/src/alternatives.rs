//! The alternative set: a small, shared table of discrete options.
//!
//! For tour scheduling each alternative is a departure/arrival window with
//! `start` and `end` hours.  `duration` is always derived (`end − start`) and
//! stored as a regular column so expressions can reference it, but it may not
//! be supplied by the caller: a stored duration could disagree with the
//! window it describes.
//!
//! # Ids and positions
//!
//! Every alternative keeps the [`AltId`] it was given in the full set.  A
//! [`subset`](AlternativeSet::subset) keeps those ids, so a choice made
//! against a subset still refers to the shared table.  "Position" means the
//! index within *this* set and is what utility matrices are indexed by.

use dcm_core::{AltId, Column, CoreError, Scalar};

use crate::{SpecError, SpecResult};

pub const START: &str = "start";
pub const END: &str = "end";
pub const DURATION: &str = "duration";

/// Start, end and duration of one alternative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    pub start:    f64,
    pub end:      f64,
    pub duration: f64,
}

/// Immutable table of alternatives, one row per option.
#[derive(Clone, Debug, PartialEq)]
pub struct AlternativeSet {
    ids:     Vec<AltId>,
    columns: Vec<(String, Column)>,
}

impl AlternativeSet {
    /// Build from named columns.  Row `i` receives `AltId(i)`.
    ///
    /// `start` and `end` are required and must be numeric; `duration` is
    /// derived and must not be present.
    pub fn new(columns: Vec<(String, Column)>) -> SpecResult<Self> {
        let len = columns.first().map_or(0, |(_, c)| c.len());
        let ids = (0..len)
            .map(|i| AltId::try_from(i).map_err(|_| SpecError::Config("too many alternatives".into())))
            .collect::<SpecResult<Vec<_>>>()?;
        Self::with_ids(ids, columns)
    }

    /// Convenience constructor from `(start, end)` pairs.
    pub fn from_windows(windows: &[(f64, f64)]) -> SpecResult<Self> {
        Self::new(vec![
            (START.to_owned(), Column::numeric(windows.iter().map(|w| w.0))),
            (END.to_owned(), Column::numeric(windows.iter().map(|w| w.1))),
        ])
    }

    fn with_ids(ids: Vec<AltId>, mut columns: Vec<(String, Column)>) -> SpecResult<Self> {
        for (i, (name, col)) in columns.iter().enumerate() {
            if col.len() != ids.len() {
                return Err(CoreError::ColumnLength {
                    name:     name.clone(),
                    expected: ids.len(),
                    got:      col.len(),
                }
                .into());
            }
            if columns[..i].iter().any(|(other, _)| other == name) {
                return Err(SpecError::Config(format!("duplicate alternative column {name:?}")));
            }
        }
        if columns.iter().any(|(name, _)| name == DURATION) {
            return Err(SpecError::Config(
                "alternative column \"duration\" is derived from end - start and must not be supplied".into(),
            ));
        }

        let start = numeric_column(&columns, START)?;
        let end = numeric_column(&columns, END)?;
        let duration: Vec<f64> = start.iter().zip(end).map(|(s, e)| e - s).collect();
        columns.push((DURATION.to_owned(), Column::Num(duration)));

        Ok(Self { ids, columns })
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Alternative ids in position order (ascending).
    pub fn ids(&self) -> &[AltId] {
        &self.ids
    }

    #[inline]
    pub fn id(&self, pos: usize) -> AltId {
        self.ids[pos]
    }

    /// Position of `id` in this set, if present.
    pub fn position_of(&self, id: AltId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    // ── Attributes ────────────────────────────────────────────────────────

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Attribute `name` of the alternative at `pos`.
    pub fn attr(&self, pos: usize, name: &str) -> Option<Scalar<'_>> {
        self.column(name).map(|c| c.get(pos))
    }

    /// The window of the alternative at `pos`.
    pub fn window_at(&self, pos: usize) -> TimeWindow {
        let num = |name: &str| match self.attr(pos, name) {
            Some(Scalar::Num(x)) => x,
            // start / end / duration are validated numeric at construction.
            _ => f64::NAN,
        };
        TimeWindow { start: num(START), end: num(END), duration: num(DURATION) }
    }

    /// The window of alternative `id`, if it is in this set.
    pub fn window(&self, id: AltId) -> Option<TimeWindow> {
        self.position_of(id).map(|pos| self.window_at(pos))
    }

    // ── Subsets ───────────────────────────────────────────────────────────

    /// Restrict to `keep` (any order, duplicates ignored).  Ids are kept.
    ///
    /// Used by callers that need to make some alternatives unavailable; the
    /// engine itself treats every alternative it is given as valid.
    pub fn subset(&self, keep: &[AltId]) -> SpecResult<AlternativeSet> {
        let mut wanted = keep.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let positions = wanted
            .iter()
            .map(|&id| {
                self.position_of(id)
                    .ok_or_else(|| SpecError::Config(format!("{id} is not in the alternative set")))
            })
            .collect::<SpecResult<Vec<usize>>>()?;

        let columns = self
            .columns
            .iter()
            .filter(|(name, _)| name != DURATION)
            .map(|(name, col)| (name.clone(), col.take(&positions)))
            .collect();
        Self::with_ids(wanted, columns)
    }
}

fn numeric_column<'a>(columns: &'a [(String, Column)], name: &str) -> SpecResult<&'a [f64]> {
    let (_, col) = columns
        .iter()
        .find(|(n, _)| n == name)
        .ok_or_else(|| SpecError::MissingColumn(name.to_owned()))?;
    col.as_num().ok_or_else(|| {
        SpecError::Config(format!("alternative column {name:?} must be numeric, found {}", col.kind()))
    })
}
