//! `ChoiceRunner`: runs one model over a whole agent table, chunk by chunk.

use dcm_agent::AgentTable;
use dcm_core::{AgentId, AltId, ChunkId, DrawStream, RunConfig, SimulationContext};
use dcm_spec::{AlternativeSet, SpecError, Specification};
use tracing::{debug, info};

use crate::{
    AgentTrace, ChoiceResult, ChunkColumns, EngineError, EngineResult, NoopObserver, RunObserver,
    evaluate_utilities, make_choices, utils_to_probs,
};

// ── Per-run lookups shared by every chunk ─────────────────────────────────────

struct RunPlan<'a> {
    /// Agent columns the specification reads (names shadowed by an
    /// alternative attribute are left out).
    names: Vec<&'a str>,
    /// `SegmentId` of the agent table → coefficient column of the spec.
    segment_cols: Vec<Option<usize>>,
}

impl<'a> RunPlan<'a> {
    fn new(agents: &AgentTable, alternatives: &AlternativeSet, spec: &'a Specification) -> Self {
        let names = spec
            .attribute_names()
            .into_iter()
            .filter(|name| !alternatives.has_column(name))
            .collect();
        let segment_cols = agents
            .segment_labels()
            .iter()
            .map(|label| spec.segment_index(label).ok())
            .collect();
        Self { names, segment_cols }
    }

    fn spec_column(&self, agents: &AgentTable, row: usize) -> EngineResult<usize> {
        self.segment_cols[agents.segment_id(row).index()]
            .ok_or_else(|| SpecError::UnknownSegment(agents.segment_label(row).to_owned()).into())
    }
}

struct ChunkOutcome {
    choices: Vec<AltId>,
    trace:   Option<AgentTrace>,
}

// ── ChoiceRunner ──────────────────────────────────────────────────────────────

/// Runs one choice model (an alternative set plus a specification) over
/// agent tables.
///
/// The runner holds only shared references; it can be reused for any number
/// of runs and tables.
pub struct ChoiceRunner<'a> {
    alternatives:   &'a AlternativeSet,
    spec:           &'a Specification,
    num_threads:    Option<usize>,
    max_chunk_rows: Option<usize>,
}

impl<'a> ChoiceRunner<'a> {
    pub fn new(alternatives: &'a AlternativeSet, spec: &'a Specification) -> Self {
        Self { alternatives, spec, num_threads: None, max_chunk_rows: None }
    }

    /// Validate `config` and take its thread count and chunk size.
    ///
    /// The chunk size is not applied here (chunk ids belong to the agent
    /// table); it becomes the largest chunk a run accepts.
    pub fn from_config(
        config:       &RunConfig,
        alternatives: &'a AlternativeSet,
        spec:         &'a Specification,
    ) -> EngineResult<Self> {
        config.validate()?;
        let max_rows = (config.chunk_size > 0).then_some(config.chunk_size);
        Ok(Self::new(alternatives, spec)
            .num_threads(config.num_threads)
            .max_chunk_rows(max_rows))
    }

    /// Size of the Rayon pool used with the `parallel` feature.  `None`
    /// uses the global pool.  Ignored without the feature.
    pub fn num_threads(mut self, n: Option<usize>) -> Self {
        self.num_threads = n;
        self
    }

    /// Reject runs whose table holds a chunk with more than `n` rows.
    /// `None` accepts any chunk.
    pub fn max_chunk_rows(mut self, n: Option<usize>) -> Self {
        self.max_chunk_rows = n;
        self
    }

    pub fn alternatives(&self) -> &AlternativeSet {
        self.alternatives
    }

    pub fn spec(&self) -> &Specification {
        self.spec
    }

    /// Simulate one choice for every agent in `agents`.
    pub fn run(&self, agents: &AgentTable, ctx: &SimulationContext) -> EngineResult<ChoiceResult> {
        self.run_observed(agents, ctx, &mut NoopObserver)
    }

    /// Like [`run`](Self::run), reporting progress to `observer`.
    ///
    /// Chunks are taken from the table's pre-assigned chunk ids in ascending
    /// order.  The first failing chunk aborts the run; no partial result is
    /// returned.  A chunk above [`max_chunk_rows`](Self::max_chunk_rows) fails
    /// the run before any chunk is evaluated.
    pub fn run_observed<O: RunObserver>(
        &self,
        agents:   &AgentTable,
        ctx:      &SimulationContext,
        observer: &mut O,
    ) -> EngineResult<ChoiceResult> {
        if self.alternatives.is_empty() {
            return Err(EngineError::NoAlternatives);
        }

        let chunks: Vec<(ChunkId, Vec<usize>)> = agents.chunk_rows().into_iter().collect();
        if let Some(limit) = self.max_chunk_rows {
            if let Some((chunk, rows)) = chunks.iter().find(|(_, rows)| rows.len() > limit) {
                return Err(EngineError::ChunkTooLarge { chunk: *chunk, rows: rows.len(), limit });
            }
        }
        let plan = RunPlan::new(agents, self.alternatives, self.spec);

        info!(
            model = %ctx.model,
            agents = agents.len(),
            chunks = chunks.len(),
            alternatives = self.alternatives.len(),
            threads = ?self.num_threads,
            "running choice model"
        );
        observer.on_run_start(&ctx.model, agents.len(), chunks.len());

        let outcomes = self.run_chunks(&plan, agents, &chunks, ctx, observer)?;

        let mut choices = vec![AltId::INVALID; agents.len()];
        for ((_, rows), outcome) in chunks.iter().zip(&outcomes) {
            for (&row, &choice) in rows.iter().zip(&outcome.choices) {
                choices[row] = choice;
            }
        }
        let missing = choices.iter().filter(|&&c| c == AltId::INVALID).count();
        if missing > 0 {
            return Err(EngineError::IncompleteResult { missing });
        }

        let result = ChoiceResult::new(agents.ids().to_vec(), choices)?;
        observer.on_run_end(&result);
        Ok(result)
    }

    // ── Chunk scheduling ──────────────────────────────────────────────────

    #[cfg(not(feature = "parallel"))]
    fn run_chunks<O: RunObserver>(
        &self,
        plan:     &RunPlan<'_>,
        agents:   &AgentTable,
        chunks:   &[(ChunkId, Vec<usize>)],
        ctx:      &SimulationContext,
        observer: &mut O,
    ) -> EngineResult<Vec<ChunkOutcome>> {
        let stream = ctx.stream();
        let mut outcomes = Vec::with_capacity(chunks.len());
        for (chunk, rows) in chunks {
            observer.on_chunk_start(*chunk, rows.len());
            let outcome = self.run_chunk(plan, agents, *chunk, rows, ctx, stream)?;
            observer.on_chunk_end(*chunk, rows.len());
            if let Some(trace) = &outcome.trace {
                observer.on_trace(trace);
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    #[cfg(feature = "parallel")]
    fn run_chunks<O: RunObserver>(
        &self,
        plan:     &RunPlan<'_>,
        agents:   &AgentTable,
        chunks:   &[(ChunkId, Vec<usize>)],
        ctx:      &SimulationContext,
        observer: &mut O,
    ) -> EngineResult<Vec<ChunkOutcome>> {
        use rayon::prelude::*;

        let stream = ctx.stream();
        let compute = || {
            chunks
                .par_iter()
                .map(|(chunk, rows)| self.run_chunk(plan, agents, *chunk, rows, ctx, stream))
                .collect::<EngineResult<Vec<_>>>()
        };
        let outcomes = match self.num_threads {
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| EngineError::ThreadPool(e.to_string()))?
                .install(compute),
            None => compute(),
        }?;

        for ((chunk, rows), outcome) in chunks.iter().zip(&outcomes) {
            observer.on_chunk_start(*chunk, rows.len());
            observer.on_chunk_end(*chunk, rows.len());
            if let Some(trace) = &outcome.trace {
                observer.on_trace(trace);
            }
        }
        Ok(outcomes)
    }

    // ── One chunk ─────────────────────────────────────────────────────────

    fn run_chunk(
        &self,
        plan:   &RunPlan<'_>,
        agents: &AgentTable,
        chunk:  ChunkId,
        rows:   &[usize],
        ctx:    &SimulationContext,
        stream: DrawStream,
    ) -> EngineResult<ChunkOutcome> {
        debug!(model = %ctx.model, chunk = chunk.0, rows = rows.len(), "simulating chunk");

        let ids: Vec<AgentId> = rows.iter().map(|&r| agents.id(r)).collect();
        let segments = rows
            .iter()
            .map(|&r| plan.spec_column(agents, r))
            .collect::<EngineResult<Vec<usize>>>()?;
        let columns = ChunkColumns::gather(agents, rows, &plan.names);

        let utils = evaluate_utilities(&columns, &ids, &segments, self.alternatives, self.spec)?;
        let probs = utils_to_probs(&utils)?;
        let draws = stream.draws(&ids);
        let choices = make_choices(&probs, &draws)?;

        let trace = ctx
            .trace_agent
            .and_then(|agent| ids.iter().position(|&a| a == agent))
            .map(|i| AgentTrace {
                model:         ctx.model.clone(),
                agent:         ids[i],
                chunk,
                segment:       agents.segment_label(rows[i]).to_owned(),
                alternatives:  self.alternatives.ids().to_vec(),
                utilities:     utils.row(i).to_vec(),
                probabilities: probs.row(i).to_vec(),
                draw:          draws[i],
                choice:        choices[i],
            });
        if let Some(t) = &trace {
            info!(
                model = %t.model,
                agent = %t.agent,
                segment = %t.segment,
                utilities = ?t.utilities,
                probabilities = ?t.probabilities,
                draw = t.draw,
                choice = %t.choice,
                "traced agent"
            );
        }

        Ok(ChunkOutcome { choices, trace })
    }
}
