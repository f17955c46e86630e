//! `ce-index` — flat categorical agent index.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`bucket`]   | `AgentBucket` — append/clear/pick container for one category |
//! | [`handle`]   | `AgentHandle` — `AgentId` stamped with its rebuild epoch     |
//! | [`index`]    | `CategoricalIndex` — one bucket per compound category        |
//! | [`error`]    | `IndexError`, `IndexResult<T>`                               |
//!
//! # Lifecycle
//!
//! ```text
//! step n:   clear() → add_agent_to_index(..)* → mark_built(n) → queries*
//! step n+1: clear() → ...                                       (handles from n are stale)
//! ```
//!
//! The index never owns agents.  It stores `AgentId`s captured during the
//! current rebuild, and every handle it returns carries the epoch so callers
//! can detect use across a rebuild.

pub mod bucket;
pub mod error;
pub mod handle;
pub mod index;


pub use bucket::AgentBucket;
pub use error::{IndexError, IndexResult};
pub use handle::AgentHandle;
pub use index::CategoricalIndex;
