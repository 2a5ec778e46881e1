//! Multinomial logit: utilities → probabilities → one choice per agent.
//!
//! Probabilities are `exp(u − max(u))` normalised by the row sum, so the
//! largest term is always `exp(0) = 1` and the sum never overflows.  Equal
//! utilities (including an all-zero row) therefore give a uniform row without
//! any special case.
//!
//! A row is *degenerate*, and fatal, when it contains NaN or `+∞`, or when no
//! utility is finite.  `−∞` marks an alternative that can never be chosen and
//! is fine as long as some other alternative is finite.

use dcm_core::{AgentId, AltId};

use crate::error::check_len;
use crate::{EngineError, EngineResult, UtilityMatrix};

// ── ProbabilityMatrix ─────────────────────────────────────────────────────────

/// Row-stochastic `agents × alternatives` matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityMatrix {
    agents: Vec<AgentId>,
    alts:   Vec<AltId>,
    data:   Vec<f64>,
}

impl ProbabilityMatrix {
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn alternatives(&self) -> &[AltId] {
        &self.alts
    }

    pub fn n_rows(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.alts.len();
        &self.data[i * w..(i + 1) * w]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.alts.len().max(1))
    }
}

// ── Probabilities ─────────────────────────────────────────────────────────────

/// Convert every row of `utils` to logit probabilities.
pub fn utils_to_probs(utils: &UtilityMatrix) -> EngineResult<ProbabilityMatrix> {
    let mut data = Vec::with_capacity(utils.n_rows() * utils.n_alts());

    for (i, &agent) in utils.agents().iter().enumerate() {
        let row = utils.row(i);

        if let Some(j) = row.iter().position(|u| u.is_nan() || *u == f64::INFINITY) {
            return Err(EngineError::DegenerateUtilities {
                agent,
                reason: format!("utility {} for {}", row[j], utils.alternatives()[j]),
            });
        }
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            return Err(EngineError::DegenerateUtilities {
                agent,
                reason: "no alternative has a finite utility".into(),
            });
        }

        let start = data.len();
        data.extend(row.iter().map(|u| (u - max).exp()));
        let sum: f64 = data[start..].iter().sum();
        for p in &mut data[start..] {
            *p /= sum;
        }
    }

    Ok(ProbabilityMatrix {
        agents: utils.agents().to_vec(),
        alts: utils.alternatives().to_vec(),
        data,
    })
}

// ── Choices ───────────────────────────────────────────────────────────────────

/// One alternative per row: the first whose cumulative probability exceeds
/// the row's draw.
///
/// Alternatives are accumulated in the matrix's column order, which is the
/// ascending `AltId` order of the alternative set.
pub fn make_choices(probs: &ProbabilityMatrix, draws: &[f64]) -> EngineResult<Vec<AltId>> {
    check_len("draws", probs.n_rows(), draws.len())?;
    Ok((0..probs.n_rows())
        .map(|i| probs.alts[choose(probs.row(i), draws[i])])
        .collect())
}

/// Position chosen by `draw` in one probability row.
///
/// If rounding leaves the total just below `draw`, the last alternative with
/// non-zero probability is taken.
pub fn choose(row: &[f64], draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (j, &p) in row.iter().enumerate() {
        cumulative += p;
        if cumulative > draw {
            return j;
        }
    }
    row.iter()
        .rposition(|&p| p > 0.0)
        .unwrap_or(row.len().saturating_sub(1))
}
