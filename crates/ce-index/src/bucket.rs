//! `AgentBucket` — the agents filed under one compound category.

use ce_core::{AgentId, AgentRng};

/// An append/clear container of agent ids for exactly one compound category.
///
/// Order is irrelevant to callers; it happens to be insertion order, which
/// keeps rebuilds deterministic.
#[derive(Clone, Debug, Default)]
pub struct AgentBucket {
    agents: Vec<AgentId>,
}

impl AgentBucket {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, agent: AgentId) {
        self.agents.push(agent);
    }

    /// Remove all agents, keeping the allocation for the next rebuild.
    #[inline]
    pub fn clear(&mut self) {
        self.agents.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Uniformly random member, or `None` if the bucket is empty.
    #[inline]
    pub fn random_agent(&self, rng: &mut AgentRng) -> Option<AgentId> {
        rng.pick(&self.agents).copied()
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.agents.contains(&agent)
    }

    /// Allocated slots, used to confirm `clear` does not shrink storage.
    pub fn capacity(&self) -> usize {
        self.agents.capacity()
    }
}
