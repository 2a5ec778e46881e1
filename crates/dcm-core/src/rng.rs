//! Deterministic, agent-scoped uniform draws.
//!
//! # Determinism strategy
//!
//! Every draw gets its own freshly seeded `SmallRng`:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!                      XOR fnv1a(model) XOR mix64(fnv1a(channel))
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Names are folded byte by byte into a `u64` (FNV-1a), so the key has no
//! per-process random state and is the same on 32- and 64-bit targets.
//! `mix64` keeps `(model, channel)` from colliding with `(channel, model)`.
//! This means:
//!
//! - A draw depends only on (seed, agent, model, channel), never on chunk
//!   index, chunk size, or the agent's position within a chunk.
//! - Two models drawing for the same agent use independent streams.
//! - There is no shared mutable state, so chunks can draw in parallel
//!   without synchronisation.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── ChoiceRng ─────────────────────────────────────────────────────────────────

/// Root of all draws for one run.  Holds only the global seed; it is `Copy`
/// and can be handed to every worker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChoiceRng {
    global_seed: u64,
}

impl ChoiceRng {
    pub fn new(global_seed: u64) -> Self {
        Self { global_seed }
    }

    pub fn global_seed(&self) -> u64 {
        self.global_seed
    }

    /// One uniform value in `[0, 1)` for `agent` in `model`/`channel`.
    ///
    /// Calling this twice with the same arguments returns the same value.
    pub fn draw(&self, agent: AgentId, model: &str, channel: &str) -> f64 {
        self.stream(model, channel).draw(agent)
    }

    /// Pre-hash the model/channel key so per-agent draws skip the string hash.
    pub fn stream(&self, model: &str, channel: &str) -> DrawStream {
        let key = fnv1a(model.as_bytes()) ^ mix64(fnv1a(channel.as_bytes()));
        DrawStream { base: self.global_seed ^ key }
    }
}

/// FNV-1a, 64-bit.
pub(crate) fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// SplitMix64 finalizer.
pub(crate) fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

// ── DrawStream ────────────────────────────────────────────────────────────────

/// A model/channel-specific view of a [`ChoiceRng`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawStream {
    base: u64,
}

impl DrawStream {
    /// Uniform value in `[0, 1)` for `agent`.
    #[inline]
    pub fn draw(&self, agent: AgentId) -> f64 {
        let seed = self.base ^ agent.0.wrapping_mul(MIXING_CONSTANT);
        SmallRng::seed_from_u64(seed).r#gen::<f64>()
    }

    /// One draw per agent, in the order given.
    pub fn draws(&self, agents: &[AgentId]) -> Vec<f64> {
        agents.iter().map(|&a| self.draw(a)).collect()
    }
}
