//! `ce-env` — the categorical environment facade.
//!
//! # Two-phase step
//!
//! ```text
//! every step:
//!   ① Rebuild — Environment::update(population, step)
//!                 clear index → classify each person → insert eligible ones
//!                 (optional) re-weight mixing rows by per-location occupancy
//!   ② Query   — any number of read-only sampling calls:
//!                 sample_target_location(source)         mixing matrix
//!                 random_agent_from_index(loc, age, sb)  bucket pick
//!                 sample_partner(source, age, sb)        both, with fallback
//! ```
//!
//! `update` takes `&mut self` and every query takes `&self`, so the borrow
//! checker enforces that no rebuild runs while sampling threads hold the
//! environment.  The only query-phase write, recording a matched location
//! pair, goes through atomic counters.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                    |
//! |------------------|-------------------------------------------------------------|
//! | [`config`]       | `AgeWindow`, `AgeBrackets`, `Eligibility`, `FallbackPolicy`, `EnvConfig` |
//! | [`environment`]  | `Environment` trait (rebuild hook + diagnostic defaults)    |
//! | [`categorical`]  | `CategoricalEnvironment`                                    |
//! | [`builder`]      | `CategoricalEnvironmentBuilder`                             |
//! | [`error`]        | `EnvError`, `EnvResult<T>`                                  |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Classifies the population on Rayon's thread pool.      |
//! | `serde`    | Serde derives on configuration types.                  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mixing = MixingModel::new(weights)?;
//! let mut env = CategoricalEnvironmentBuilder::new(Dimensions::new(3, 1, 1)?, mixing)
//!     .age_window(15.0, 40.0)
//!     .fallback(FallbackPolicy::Redraw { attempts: 2 })
//!     .build()?;
//!
//! env.update(&population, Step(0))?;
//! if let Some(partner) = env.sample_partner(0, 0, 0, rngs.get_mut(man))? {
//!     let woman = env.resolve(partner)?;
//! }
//! ```

pub mod builder;
pub mod categorical;
pub mod config;
pub mod environment;
pub mod error;

#[cfg(test)]
mod tests;

pub use builder::CategoricalEnvironmentBuilder;
pub use categorical::CategoricalEnvironment;
pub use config::{AgeBrackets, AgeWindow, Eligibility, EnvConfig, FallbackPolicy};
pub use environment::Environment;
pub use error::{EnvError, EnvResult};
