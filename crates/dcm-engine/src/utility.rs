//! Utility evaluation: `agents × alternatives` matrices for one chunk.
//!
//! # Loop order
//!
//! ```text
//! for each alternative j                 (small: tens to hundreds)
//!     scope = agent columns ⊕ attributes of j
//!     for each spec row with a non-zero coefficient in this chunk
//!         v = eval(row.expr, scope)      (vectorized over all agents)
//!         u[·][j] += coef[segment(·)] × v
//! ```
//!
//! The number of expression evaluations per chunk is `rows × alternatives`,
//! independent of how many agents the chunk holds.

use dcm_agent::AgentTable;
use dcm_core::{AgentId, AltId, Column};
use dcm_expr::{Attr, ExprError, Scope, Value, evaluate};
use dcm_spec::{AlternativeSet, SpecRow, Specification};

use crate::error::check_len;
use crate::{EngineError, EngineResult};

// ── UtilityMatrix ─────────────────────────────────────────────────────────────

/// Dense row-major `agents × alternatives` table of utilities.
///
/// Rows are labelled by agent id and columns by alternative id so the
/// matrix can be interpreted without the tables it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct UtilityMatrix {
    agents: Vec<AgentId>,
    alts:   Vec<AltId>,
    data:   Vec<f64>,
}

impl UtilityMatrix {
    pub fn zeros(agents: Vec<AgentId>, alts: Vec<AltId>) -> Self {
        let data = vec![0.0; agents.len() * alts.len()];
        Self { agents, alts, data }
    }

    /// Wrap pre-computed row-major values.
    pub fn from_vec(agents: Vec<AgentId>, alts: Vec<AltId>, data: Vec<f64>) -> EngineResult<Self> {
        check_len("utility data", agents.len() * alts.len(), data.len())?;
        Ok(Self { agents, alts, data })
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn alternatives(&self) -> &[AltId] {
        &self.alts
    }

    pub fn n_rows(&self) -> usize {
        self.agents.len()
    }

    pub fn n_alts(&self) -> usize {
        self.alts.len()
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.alts.len();
        &self.data[i * w..(i + 1) * w]
    }

    /// Iterator over rows in agent order.  Yields nothing when there are no
    /// alternatives.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.alts.len().max(1))
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.alts.len() + j]
    }

    fn set_column(&mut self, j: usize, values: &[f64]) {
        let w = self.alts.len();
        for (i, &v) in values.iter().enumerate() {
            self.data[i * w + j] = v;
        }
    }
}

// ── ChunkColumns ──────────────────────────────────────────────────────────────

/// The agent columns one chunk needs, gathered from the full table.
#[derive(Clone, Debug)]
pub struct ChunkColumns<'t> {
    len:     usize,
    columns: Vec<(&'t str, Column)>,
}

impl<'t> ChunkColumns<'t> {
    /// Gather `names` for `rows` of `agents`.  Names the table lacks are
    /// skipped; they fail later as unknown attributes if nothing else
    /// provides them.
    pub fn gather(agents: &'t AgentTable, rows: &[usize], names: &[&str]) -> Self {
        let columns = agents
            .column_names()
            .filter(|name| names.iter().any(|n| n == name))
            .filter_map(|name| agents.column(name).map(|col| (name, col.take(rows))))
            .collect();
        Self { len: rows.len(), columns }
    }

    /// Build from already-sliced columns.  Every column must hold `len`
    /// values.
    pub fn from_columns(len: usize, columns: Vec<(&'t str, Column)>) -> EngineResult<Self> {
        for (_, col) in &columns {
            check_len("agent column", len, col.len())?;
        }
        Ok(Self { len, columns })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| *n == name).map(|(_, c)| c)
    }
}

// ── EvalScope ─────────────────────────────────────────────────────────────────

/// Attribute lookup for one alternative: the alternative's own attributes
/// first, then the chunk's agent columns.
pub struct EvalScope<'a> {
    agents:       &'a ChunkColumns<'a>,
    alternatives: &'a AlternativeSet,
    pos:          usize,
}

impl<'a> EvalScope<'a> {
    pub fn new(agents: &'a ChunkColumns<'a>, alternatives: &'a AlternativeSet, pos: usize) -> Self {
        Self { agents, alternatives, pos }
    }
}

impl Scope for EvalScope<'_> {
    fn len(&self) -> usize {
        self.agents.len()
    }

    fn lookup(&self, name: &str) -> Option<Attr<'_>> {
        match self.alternatives.attr(self.pos, name) {
            Some(value) => Some(Attr::Scalar(value)),
            None => self.agents.column(name).map(Attr::Column),
        }
    }
}

// ── Evaluation ────────────────────────────────────────────────────────────────

/// A spec row that matters to the current chunk, with one coefficient per
/// agent.
struct Term<'s> {
    index: usize,
    row:   &'s SpecRow,
    coefs: Vec<f64>,
}

/// Utilities for every agent of a chunk against every alternative.
///
/// `segments[i]` is the specification's coefficient column for agent `i`.
/// Rows whose coefficient is zero for every segment in the chunk are never
/// evaluated.  An agent whose coefficient is zero receives no contribution
/// from that row, even where the expression is non-finite.
pub fn evaluate_utilities(
    agents:       &ChunkColumns<'_>,
    ids:          &[AgentId],
    segments:     &[usize],
    alternatives: &AlternativeSet,
    spec:         &Specification,
) -> EngineResult<UtilityMatrix> {
    let n = ids.len();
    check_len("agent columns", n, agents.len())?;
    check_len("segment indices", n, segments.len())?;

    let mut present = segments.to_vec();
    present.sort_unstable();
    present.dedup();

    let terms: Vec<Term<'_>> = spec
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| present.iter().any(|&s| row.coefficient(s) != 0.0))
        .map(|(index, row)| Term {
            index,
            row,
            coefs: segments.iter().map(|&s| row.coefficient(s)).collect(),
        })
        .collect();

    let mut utils = UtilityMatrix::zeros(ids.to_vec(), alternatives.ids().to_vec());
    let mut column = vec![0.0; n];

    for pos in 0..alternatives.len() {
        let scope = EvalScope::new(agents, alternatives, pos);
        column.fill(0.0);
        for term in &terms {
            evaluate(&term.row.expr, &scope)
                .and_then(|value| accumulate(&mut column, &term.coefs, value))
                .map_err(|source| EngineError::Expression {
                    row: term.index,
                    expression: term.row.expression.clone(),
                    source,
                })?;
        }
        utils.set_column(pos, &column);
    }

    Ok(utils)
}

/// `column[i] += coefs[i] × value[i]`, skipping zero coefficients.
fn accumulate(column: &mut [f64], coefs: &[f64], value: Value<'_>) -> Result<(), ExprError> {
    match value {
        Value::Num(x) => {
            for (u, &c) in column.iter_mut().zip(coefs) {
                if c != 0.0 {
                    *u += c * x;
                }
            }
        }
        Value::Vec(v) => {
            for ((u, &c), &x) in column.iter_mut().zip(coefs).zip(v.iter()) {
                if c != 0.0 {
                    *u += c * x;
                }
            }
        }
        other => {
            return Err(ExprError::TypeMismatch {
                op:    "utility term",
                left:  other.kind(),
                right: "number",
            });
        }
    }
    Ok(())
}
