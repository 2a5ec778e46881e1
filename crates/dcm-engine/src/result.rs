//! `ChoiceResult`: the engine's output for one model run.

use dcm_core::{AgentId, AltId};
use rustc_hash::FxHashMap;

use crate::error::check_len;
use crate::{EngineError, EngineResult};

/// One chosen alternative per agent, in the agent table's row order.
///
/// Created fresh by every run; nothing is cached between runs.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceResult {
    agents:  Vec<AgentId>,
    choices: Vec<AltId>,
    index:   FxHashMap<AgentId, usize>,
}

impl ChoiceResult {
    /// Pair `agents` with `choices`.  Agent ids must be unique.
    pub fn new(agents: Vec<AgentId>, choices: Vec<AltId>) -> EngineResult<Self> {
        check_len("choices", agents.len(), choices.len())?;
        let mut index = FxHashMap::with_capacity_and_hasher(agents.len(), Default::default());
        for (row, &agent) in agents.iter().enumerate() {
            if index.insert(agent, row).is_some() {
                return Err(EngineError::DuplicateAgent(agent));
            }
        }
        Ok(Self { agents, choices, index })
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    /// Chosen alternatives, aligned with [`agents`](Self::agents).
    pub fn choices(&self) -> &[AltId] {
        &self.choices
    }

    /// Choice of `agent`, if it was part of the run.
    pub fn get(&self, agent: AgentId) -> Option<AltId> {
        self.index.get(&agent).map(|&row| self.choices[row])
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, AltId)> + '_ {
        self.agents.iter().copied().zip(self.choices.iter().copied())
    }
}
