//! Epoch-stamped agent references.

use std::fmt;

use ce_core::{AgentId, Step};

/// A non-owning reference to an agent, valid only for the rebuild that
/// produced it.
///
/// `epoch` is the step the index was built for and `generation` counts the
/// rebuild itself.  After any later rebuild, even one for the same step, the
/// handle no longer refers to anything the index vouches for and must be
/// rejected rather than dereferenced.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentHandle {
    pub agent:      AgentId,
    pub epoch:      Step,
    pub generation: u64,
}

impl AgentHandle {
    #[inline]
    pub fn new(agent: AgentId, epoch: Step, generation: u64) -> Self {
        Self { agent, epoch, generation }
    }

    /// `true` if the handle was captured during rebuild number `generation`.
    #[inline]
    pub fn is_from(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

impl fmt::Display for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}#{}", self.agent, self.epoch, self.generation)
    }
}
