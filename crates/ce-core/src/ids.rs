//! Agent identifier.
//!
//! `AgentId` is `Copy + Ord + Hash` so it can be stored in buckets, used as a
//! map key and sorted without ceremony.  The inner integer is `pub` to allow
//! direct indexing into the population's SoA `Vec`s, but callers should prefer
//! `.index()`.

use std::fmt;

/// Index of a person in the host population's SoA storage.  Max ~4.3 billion
/// agents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl AgentId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}
