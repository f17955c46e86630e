//! `ce-core` — foundational types for the `rust_ce` categorical environment.
//!
//! This crate is a dependency of every other `ce-*` crate.  It has no `ce-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`time`]        | `Step`, `StepClock`                                   |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`category`]    | `Dimensions`, `CategoryKey`, `CompoundIndexer`        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod category;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use category::{CategoryKey, CompoundIndexer, Dimension, Dimensions};
pub use error::{CoreError, CoreResult};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use time::{Step, StepClock};
