//! The utility specification: expression rows × segment coefficients.
//!
//! ```text
//!                      segment →   work      school
//! row 0   "start < 7"             -0.51       0.00
//! row 1   "duration * age"         0.02       0.01
//! row 2   "1"                      1.00       0.00
//! ```
//!
//! Every row holds one coefficient per segment; blank cells are stored as
//! `0.0` so a row simply has no effect on segments that leave it empty.
//! Expressions are compiled when the row is added; a malformed expression
//! fails the load, never a later simulation.

use std::collections::BTreeSet;

use dcm_expr::Expr;

use crate::{SpecError, SpecResult};

/// One specification row.
#[derive(Clone, Debug, PartialEq)]
pub struct SpecRow {
    /// Free-text label, informational only.
    pub description: String,
    /// Source text of the expression.
    pub expression:  String,
    /// Compiled form of `expression`.
    pub expr:        Expr,
    /// One coefficient per segment, aligned with [`Specification::segments`].
    coefficients:    Vec<f64>,
}

impl SpecRow {
    #[inline]
    pub fn coefficient(&self, segment: usize) -> f64 {
        self.coefficients[segment]
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// A compiled specification, immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Specification {
    segments: Vec<String>,
    rows:     Vec<SpecRow>,
}

impl Specification {
    /// Empty specification with the given coefficient columns.
    pub fn new<I, S>(segments: I) -> SpecResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(SpecError::Config("specification needs at least one segment column".into()));
        }
        for (i, name) in segments.iter().enumerate() {
            if segments[..i].contains(name) {
                return Err(SpecError::Config(format!("duplicate segment column {name:?}")));
            }
        }
        Ok(Self { segments, rows: Vec::new() })
    }

    /// Compile and append a row.
    ///
    /// `coefficients` is aligned with [`segments`](Self::segments); `None`
    /// entries (blank cells) become `0.0`.
    pub fn push_row(
        &mut self,
        description:  impl Into<String>,
        expression:   &str,
        coefficients: &[Option<f64>],
    ) -> SpecResult<()> {
        let row = self.rows.len();
        if coefficients.len() != self.segments.len() {
            return Err(SpecError::Config(format!(
                "row {row}: {} coefficient(s) for {} segment(s)",
                coefficients.len(),
                self.segments.len()
            )));
        }
        let expr = Expr::parse(expression).map_err(|source| SpecError::Expression {
            row,
            expression: expression.to_owned(),
            source,
        })?;
        self.rows.push(SpecRow {
            description: description.into(),
            expression:  expression.to_owned(),
            expr,
            coefficients: coefficients.iter().map(|c| c.unwrap_or(0.0)).collect(),
        });
        Ok(())
    }

    /// Append a row giving coefficients by segment name; unnamed segments get
    /// `0.0`.
    pub fn push_named(&mut self, expression: &str, coefficients: &[(&str, f64)]) -> SpecResult<()> {
        let mut aligned = vec![None; self.segments.len()];
        for &(segment, value) in coefficients {
            aligned[self.segment_index(segment)?] = Some(value);
        }
        self.push_row("", expression, &aligned)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn rows(&self) -> &[SpecRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index of `segment`.  Unknown names are a hard error.
    pub fn segment_index(&self, segment: &str) -> SpecResult<usize> {
        self.segments
            .iter()
            .position(|s| s == segment)
            .ok_or_else(|| SpecError::UnknownSegment(segment.to_owned()))
    }

    /// One coefficient per row for `segment`.
    pub fn coefficients(&self, segment: &str) -> SpecResult<Vec<f64>> {
        let idx = self.segment_index(segment)?;
        Ok(self.rows.iter().map(|r| r.coefficient(idx)).collect())
    }

    /// Overwrite one coefficient (used when calibrating a model).
    pub fn set_coefficient(&mut self, row: usize, segment: &str, value: f64) -> SpecResult<()> {
        let idx = self.segment_index(segment)?;
        let len = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or_else(|| SpecError::Config(format!("row {row} out of range ({len} rows)")))?;
        target.coefficients[idx] = value;
        Ok(())
    }

    /// Every attribute name referenced by any row.
    pub fn attribute_names(&self) -> BTreeSet<&str> {
        self.rows.iter().flat_map(|r| r.expr.identifiers()).collect()
    }
}
