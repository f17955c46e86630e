//! The `Environment` trait — the hook a host engine calls once per step.

use ce_core::Step;
use ce_population::PersonStore;

use crate::EnvResult;

/// A per-step rebuildable view of the population.
///
/// Only [`update`](Self::update) is required.  The diagnostic methods have
/// empty defaults so simple environments don't need to implement them.
///
/// # Contract
///
/// The host calls `update` exactly once per step, before any query for that
/// step.  After it returns, every insertion from the rebuild is visible and
/// handles from earlier steps are stale.
pub trait Environment {
    /// Discard the previous step's contents and rebuild from `population`.
    fn update(&mut self, population: &PersonStore, step: Step) -> EnvResult<()>;

    /// Occupancy report for logs.
    fn describe_population(&self) -> String {
        String::new()
    }

    /// Observed mate-location counts for logs.
    fn describe_mate_location_frequencies(&self) -> String {
        String::new()
    }
}
