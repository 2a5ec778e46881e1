//! Run observer trait for progress reporting and diagnostics.

use dcm_core::{AgentId, AltId, ChunkId};

use crate::ChoiceResult;

/// Everything the engine computed for the traced agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentTrace {
    pub model:         String,
    pub agent:         AgentId,
    pub chunk:         ChunkId,
    pub segment:       String,
    pub alternatives:  Vec<AltId>,
    pub utilities:     Vec<f64>,
    pub probabilities: Vec<f64>,
    pub draw:          f64,
    pub choice:        AltId,
}

/// Callbacks invoked by [`ChoiceRunner::run_observed`][crate::ChoiceRunner::run_observed].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// With the `parallel` feature chunks are computed concurrently and the
/// chunk callbacks are replayed afterwards in ascending chunk order, so an
/// observer always sees the same sequence.
pub trait RunObserver {
    /// Called once before any chunk runs.
    fn on_run_start(&mut self, _model: &str, _agents: usize, _chunks: usize) {}

    fn on_chunk_start(&mut self, _chunk: ChunkId, _rows: usize) {}

    fn on_chunk_end(&mut self, _chunk: ChunkId, _rows: usize) {}

    /// Called for the context's trace agent, if it is part of the run.
    fn on_trace(&mut self, _trace: &AgentTrace) {}

    /// Called once after every chunk completed successfully.
    fn on_run_end(&mut self, _result: &ChoiceResult) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Keeps every trace it is handed, plus the chunk order it observed.
#[derive(Default)]
pub struct TraceCollector {
    pub traces: Vec<AgentTrace>,
    pub chunks: Vec<ChunkId>,
}

impl RunObserver for TraceCollector {
    fn on_chunk_end(&mut self, chunk: ChunkId, _rows: usize) {
        self.chunks.push(chunk);
    }

    fn on_trace(&mut self, trace: &AgentTrace) {
        self.traces.push(trace.clone());
    }
}
