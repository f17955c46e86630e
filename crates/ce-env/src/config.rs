//! Eligibility, age classification, and fallback configuration.

use std::fmt;

use ce_population::Sex;

use crate::{EnvError, EnvResult};

// ── AgeWindow ─────────────────────────────────────────────────────────────────

/// Half-open age interval `[min_age, max_age)` within which a person can be
/// indexed as a partner.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AgeWindow {
    min_age: f32,
    max_age: f32,
}

impl AgeWindow {
    pub fn new(min_age: f32, max_age: f32) -> EnvResult<Self> {
        if !min_age.is_finite() || !max_age.is_finite() || min_age < 0.0 {
            return Err(EnvError::Config(format!(
                "age window [{min_age}, {max_age}) must be finite and non-negative"
            )));
        }
        if min_age >= max_age {
            return Err(EnvError::Config(format!(
                "age window [{min_age}, {max_age}) is empty"
            )));
        }
        Ok(Self { min_age, max_age })
    }

    #[inline]
    pub fn min_age(&self) -> f32 {
        self.min_age
    }

    #[inline]
    pub fn max_age(&self) -> f32 {
        self.max_age
    }

    #[inline]
    pub fn contains(&self, age: f32) -> bool {
        age >= self.min_age && age < self.max_age
    }
}

// ── AgeBrackets ───────────────────────────────────────────────────────────────

/// Splits an [`AgeWindow`] into `count` equal-width brackets.
///
/// Bracket `k` covers `[min + k·w, min + (k+1)·w)` with
/// `w = (max - min) / count`.  Rounding at the top edge is absorbed by the
/// last bracket.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AgeBrackets {
    window: AgeWindow,
    count:  usize,
}

impl AgeBrackets {
    pub fn new(window: AgeWindow, count: usize) -> EnvResult<Self> {
        if count == 0 {
            return Err(EnvError::Config("number of age brackets must be > 0".into()));
        }
        Ok(Self { window, count })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn window(&self) -> AgeWindow {
        self.window
    }

    /// Width of one bracket in years.
    pub fn width(&self) -> f32 {
        (self.window.max_age - self.window.min_age) / self.count as f32
    }

    /// Bracket for `age`, or `None` outside the window.
    pub fn bracket(&self, age: f32) -> Option<usize> {
        if !self.window.contains(age) {
            return None;
        }
        let k = ((age - self.window.min_age) / self.width()) as usize;
        Some(k.min(self.count - 1))
    }
}

// ── Eligibility ───────────────────────────────────────────────────────────────

/// Who gets indexed.  People failing any test are never inserted and so can
/// never be sampled.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Eligibility {
    pub window:            AgeWindow,
    /// Index only this sex; `None` indexes everyone.
    pub sex:               Option<Sex>,
    /// Skip people currently in a regular partnership.
    pub exclude_partnered: bool,
}

impl Eligibility {
    #[inline]
    pub fn admits(&self, age: f32, sex: Sex, partnered: bool) -> bool {
        self.window.contains(age)
            && self.sex.is_none_or(|s| s == sex)
            && !(self.exclude_partnered && partnered)
    }
}

// ── FallbackPolicy ────────────────────────────────────────────────────────────

/// What [`sample_partner`](crate::CategoricalEnvironment::sample_partner)
/// does when the sampled target location has nobody in the requested
/// category.
///
/// Every policy consumes random draws in a fixed order, so results are
/// reproducible for a given RNG seed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "policy", rename_all = "snake_case"))]
pub enum FallbackPolicy {
    /// Report no match.
    #[default]
    NoMatch,
    /// Draw up to `attempts` further target locations before giving up.
    Redraw { attempts: u32 },
    /// Try the querying agent's own location once before giving up.
    OwnLocation,
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::NoMatch             => f.write_str("no-match"),
            FallbackPolicy::Redraw { attempts } => write!(f, "redraw({attempts})"),
            FallbackPolicy::OwnLocation         => f.write_str("own-location"),
        }
    }
}

// ── EnvConfig ─────────────────────────────────────────────────────────────────

/// Plain configuration record, e.g. deserialised from JSON by the host.
///
/// Defaults index women aged `[15, 40)` in a single location with one age
/// bracket and one risk class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvConfig {
    pub locations:           usize,
    pub age_brackets:        usize,
    pub risk_classes:        usize,
    pub min_age:             f32,
    pub max_age:             f32,
    pub indexed_sex:         Option<Sex>,
    pub exclude_partnered:   bool,
    /// Row `i` holds the raw weights for partners of agents at location `i`.
    pub mixing_weights:      Vec<Vec<f64>>,
    pub fallback:            FallbackPolicy,
    pub weight_by_occupancy: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            locations:           1,
            age_brackets:        1,
            risk_classes:        1,
            min_age:             15.0,
            max_age:             40.0,
            indexed_sex:         Some(Sex::Female),
            exclude_partnered:   false,
            mixing_weights:      vec![vec![1.0]],
            fallback:            FallbackPolicy::NoMatch,
            weight_by_occupancy: false,
        }
    }
}
