//! Run configuration and the per-model simulation context.
//!
//! `RunConfig` is the handful of knobs the engine consumes; it is typically
//! loaded from a JSON file by the application crate.  `SimulationContext` is
//! built from it for one model run and threaded explicitly through every
//! engine call; there is no process-wide seed.

use crate::{AgentId, ChoiceRng, CoreError, CoreResult, DrawStream};

/// Channel name used when a model draws only once per agent.
pub const DEFAULT_CHANNEL: &str = "choice";

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Engine configuration for one process run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Maximum rows per chunk.  `0` disables chunking (one chunk holds the
    /// whole population).
    pub chunk_size: usize,

    /// Master seed.  The same seed always produces identical choices.
    pub seed: u64,

    /// Agent whose utilities, probabilities and draw are logged.  Purely
    /// diagnostic; it never changes any draw.
    pub trace_agent: Option<AgentId>,

    /// Worker thread count for the Rayon pool (`parallel` feature).  `None`
    /// uses all logical cores.
    pub num_threads: Option<usize>,
}

impl RunConfig {
    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Context for one model run using the default draw channel.
    pub fn context(&self, model: impl Into<String>) -> SimulationContext {
        SimulationContext::new(self, model)
    }
}

// ── SimulationContext ─────────────────────────────────────────────────────────

/// Everything a single model run needs besides its data: the seed, the model
/// and channel names that key its draws, and the optional trace agent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationContext {
    pub seed:        u64,
    pub model:       String,
    pub channel:     String,
    pub trace_agent: Option<AgentId>,
}

impl SimulationContext {
    pub fn new(config: &RunConfig, model: impl Into<String>) -> Self {
        Self {
            seed:        config.seed,
            model:       model.into(),
            channel:     DEFAULT_CHANNEL.to_owned(),
            trace_agent: config.trace_agent,
        }
    }

    /// Use a non-default draw channel (for models drawing more than once).
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// The draw stream for this model/channel.
    pub fn stream(&self) -> DrawStream {
        ChoiceRng::new(self.seed).stream(&self.model, &self.channel)
    }

    #[inline]
    pub fn is_traced(&self, agent: AgentId) -> bool {
        self.trace_agent == Some(agent)
    }
}
