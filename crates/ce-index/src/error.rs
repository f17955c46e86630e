use ce_core::{CoreError, Step};
use thiserror::Error;

use crate::AgentHandle;

/// Precondition violations on the categorical index.
///
/// An empty bucket is *not* an error: sampling returns `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("invalid category key: {0}")]
    Key(#[from] CoreError),

    #[error("categorical index queried before any rebuild completed")]
    NotBuilt,

    #[error("stale handle {handle}: index was rebuilt for {current}")]
    StaleHandle {
        handle:  AgentHandle,
        current: Step,
    },
}

pub type IndexResult<T> = Result<T, IndexError>;
