//! Seeded random streams for partner sampling and population generation.
//!
//! A partner search draws from the querying agent's own stream, so the
//! matches one agent makes do not depend on which thread ran it or how many
//! other agents searched first.  Agent streams are seeded as
//!
//!   seed = global_seed XOR (agent_id * GOLDEN_GAMMA)
//!
//! which keeps neighbouring ids far apart in seed space.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// Fractional part of the golden ratio in 64 bits.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Random stream owned by one agent.
///
/// Kept in `AgentRngs` next to the population so a sampling pass can borrow
/// one agent's stream mutably while reading everyone else.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ u64::from(agent.0).wrapping_mul(GOLDEN_GAMMA);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform draw in `[0, 1)` for inverse-CDF target sampling.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// `true` with probability `p`; `p` outside `[0, 1]` is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform pick from `items`; `None` when empty.
    #[inline]
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Single-threaded stream for building synthetic populations and drawing
/// population-wide events between steps.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
