//! Simulation step counter and calendar mapping.
//!
//! The host engine advances one `Step` per simulated year.  The categorical
//! index stamps every rebuild with the step it was built for, and agent
//! handles carry that stamp so a handle captured in step `n` is rejected in
//! step `n + 1`.

use std::fmt;

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// The step immediately after `self`.
    #[inline]
    pub fn next(self) -> Step {
        Step(self.0 + 1)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── StepClock ─────────────────────────────────────────────────────────────────

/// Tracks the current step and maps it to a calendar year.
///
///   year = start_year + current_step
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepClock {
    pub start_year:   i32,
    pub current_step: Step,
}

impl StepClock {
    pub fn new(start_year: i32) -> Self {
        Self { start_year, current_step: Step::ZERO }
    }

    /// Advance by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step = self.current_step.next();
    }

    /// Calendar year of the current step.
    #[inline]
    pub fn year(&self) -> i64 {
        self.year_of(self.current_step)
    }

    /// Calendar year of an arbitrary step.
    #[inline]
    pub fn year_of(&self, step: Step) -> i64 {
        self.start_year as i64 + step.0 as i64
    }
}
