//! `ce-population` — Structure-of-Arrays person storage for the `rust_ce`
//! categorical environment.
//!
//! The host engine owns the population; this crate only defines the layout
//! the categorical environment reads during its per-step rebuild.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`person`]      | `Sex`, `Person` (one row of the store)                    |
//! | [`store`]       | `PersonStore` (SoA arrays), `AgentRngs` (per-agent RNG)   |
//! | [`builder`]     | `PersonStoreBuilder` (fluent construction)                |

pub mod builder;
pub mod person;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::PersonStoreBuilder;
pub use person::{Person, Sex};
pub use store::{AgentRngs, PersonStore};
