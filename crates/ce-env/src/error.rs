use ce_core::{AgentId, CoreError};
use ce_index::IndexError;
use ce_mixing::MixingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("environment configuration error: {0}")]
    Config(String),

    #[error("invalid dimensions: {0}")]
    Dimensions(#[from] CoreError),

    #[error("{agent} cannot be indexed: {source}")]
    InvalidPerson {
        agent:  AgentId,
        source: CoreError,
    },

    #[error("{agent} is not in a population of {count}")]
    UnknownAgent {
        agent: AgentId,
        count: usize,
    },

    #[error("population count mismatch for {what}: expected {expected}, got {got}")]
    PopulationMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("mixing model: {0}")]
    Mixing(#[from] MixingError),
}

pub type EnvResult<T> = Result<T, EnvError>;
