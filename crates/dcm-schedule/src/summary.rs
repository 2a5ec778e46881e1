//! Descriptive statistics of one scheduling pass.

use std::fmt;

use dcm_core::AltId;
use dcm_engine::ChoiceResult;
use dcm_spec::{AlternativeSet, TimeWindow};
use tracing::{debug, info};

use crate::{ScheduleError, ScheduleResult};

/// How many agents chose one alternative.
#[derive(Clone, Debug, PartialEq)]
pub struct AltShare {
    pub alt:    AltId,
    pub window: TimeWindow,
    pub count:  usize,
    /// `count / total`, or `0.0` for an empty pass.
    pub share:  f64,
}

/// Choice counts and shares for every alternative, in alternative order.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceSummary {
    pub total:  usize,
    pub shares: Vec<AltShare>,
}

impl ChoiceSummary {
    pub fn from_choices(result: &ChoiceResult, alternatives: &AlternativeSet) -> ScheduleResult<Self> {
        let mut counts = vec![0usize; alternatives.len()];
        for &alt in result.choices() {
            let pos = alternatives
                .position_of(alt)
                .ok_or(ScheduleError::UnknownAlternative(alt))?;
            counts[pos] += 1;
        }

        let total = result.len();
        let shares = counts
            .into_iter()
            .enumerate()
            .map(|(pos, count)| AltShare {
                alt: alternatives.id(pos),
                window: alternatives.window_at(pos),
                count,
                share: if total == 0 { 0.0 } else { count as f64 / total as f64 },
            })
            .collect();

        Ok(Self { total, shares })
    }

    pub fn count(&self, alt: AltId) -> usize {
        self.shares.iter().find(|s| s.alt == alt).map_or(0, |s| s.count)
    }

    /// Count-weighted mean start hour; NaN for an empty pass.
    pub fn mean_start(&self) -> f64 {
        self.weighted_mean(|w| w.start)
    }

    /// Count-weighted mean duration in hours; NaN for an empty pass.
    pub fn mean_duration(&self) -> f64 {
        self.weighted_mean(|w| w.duration)
    }

    fn weighted_mean(&self, f: impl Fn(&TimeWindow) -> f64) -> f64 {
        let sum: f64 = self.shares.iter().map(|s| s.count as f64 * f(&s.window)).sum();
        sum / self.total as f64
    }

    /// Emit the summary as tracing events.
    pub fn log(&self, model: &str, segment: &str) {
        info!(
            model,
            segment,
            tours = self.total,
            mean_start = self.mean_start(),
            mean_duration = self.mean_duration(),
            "scheduled tours"
        );
        for s in self.shares.iter().filter(|s| s.count > 0) {
            debug!(
                model,
                alt = s.alt.0,
                start = s.window.start,
                end = s.window.end,
                count = s.count,
                share = s.share,
                "choice share"
            );
        }
    }
}

impl fmt::Display for ChoiceSummary {
    /// One line per chosen alternative: `start-end  count  share%`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6}  {:>5}-{:<5} {:>9} {:>7}", "alt", "start", "end", "count", "share")?;
        for s in self.shares.iter().filter(|s| s.count > 0) {
            writeln!(
                f,
                "{:>6}  {:>5}-{:<5} {:>9} {:>6.2}%",
                s.alt.0,
                s.window.start,
                s.window.end,
                s.count,
                s.share * 100.0
            )?;
        }
        write!(f, "{:>6}  {:>11} {:>9}", "total", "", self.total)
    }
}
