//! Fluent builder for constructing a [`CategoricalEnvironment`].

use ce_core::Dimensions;
use ce_index::CategoricalIndex;
use ce_mixing::MixingModel;
use ce_population::Sex;
use tracing::info;

use crate::{
    AgeBrackets, AgeWindow, CategoricalEnvironment, Eligibility, EnvConfig, EnvError, EnvResult,
    FallbackPolicy,
};

/// Fluent builder for [`CategoricalEnvironment`].
///
/// # Required inputs
///
/// - [`Dimensions`]: location, age-bracket and risk-class counts
/// - [`MixingModel`]: one row per location
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                  |
/// |----------------------------|--------------------------|
/// | `.age_window(min, max)`    | `[15, 40)`               |
/// | `.indexed_sex(s)`          | `Some(Sex::Female)`      |
/// | `.exclude_partnered(b)`    | `false`                  |
/// | `.fallback(p)`             | `FallbackPolicy::NoMatch`|
/// | `.weight_by_occupancy(b)`  | `false`                  |
///
/// # Example
///
/// ```rust,ignore
/// let env = CategoricalEnvironmentBuilder::new(Dimensions::new(3, 5, 2)?, mixing)
///     .age_window(15.0, 50.0)
///     .exclude_partnered(true)
///     .build()?;
/// ```
pub struct CategoricalEnvironmentBuilder {
    dims:                Dimensions,
    mixing:              MixingModel,
    min_age:             f32,
    max_age:             f32,
    indexed_sex:         Option<Sex>,
    exclude_partnered:   bool,
    fallback:            FallbackPolicy,
    weight_by_occupancy: bool,
}

impl CategoricalEnvironmentBuilder {
    /// Create a builder with all required inputs.
    pub fn new(dims: Dimensions, mixing: MixingModel) -> Self {
        Self {
            dims,
            mixing,
            min_age:             15.0,
            max_age:             40.0,
            indexed_sex:         Some(Sex::Female),
            exclude_partnered:   false,
            fallback:            FallbackPolicy::NoMatch,
            weight_by_occupancy: false,
        }
    }

    /// Ages admitted to the index, `[min_age, max_age)`.  The window is split
    /// evenly into the configured number of age brackets.
    pub fn age_window(mut self, min_age: f32, max_age: f32) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    /// Index only people of this sex.  `None` indexes everyone.
    pub fn indexed_sex(mut self, sex: Option<Sex>) -> Self {
        self.indexed_sex = sex;
        self
    }

    /// Leave people in a regular partnership out of the index.
    pub fn exclude_partnered(mut self, exclude: bool) -> Self {
        self.exclude_partnered = exclude;
        self
    }

    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Re-weight mixing rows by per-location occupancy after every rebuild.
    pub fn weight_by_occupancy(mut self, enabled: bool) -> Self {
        self.weight_by_occupancy = enabled;
        self
    }

    /// Validate inputs and return an environment awaiting its first
    /// [`update`](CategoricalEnvironment::update).
    pub fn build(self) -> EnvResult<CategoricalEnvironment> {
        if self.mixing.size() != self.dims.locations() {
            return Err(EnvError::Config(format!(
                "mixing model covers {} locations but the index has {}",
                self.mixing.size(),
                self.dims.locations(),
            )));
        }

        let window = AgeWindow::new(self.min_age, self.max_age)?;
        let brackets = AgeBrackets::new(window, self.dims.age_brackets())?;
        let eligibility = Eligibility {
            window,
            sex:               self.indexed_sex,
            exclude_partnered: self.exclude_partnered,
        };

        info!(
            locations    = self.dims.locations(),
            age_brackets = self.dims.age_brackets(),
            risk_classes = self.dims.risk_classes(),
            buckets      = self.dims.bucket_count(),
            fallback     = %self.fallback,
            "categorical environment configured"
        );

        Ok(CategoricalEnvironment {
            index:               CategoricalIndex::new(self.dims),
            brackets,
            eligibility,
            mixing:              self.mixing,
            fallback:            self.fallback,
            weight_by_occupancy: self.weight_by_occupancy,
        })
    }
}

impl EnvConfig {
    /// Validate this record and build the environment it describes.
    pub fn build(self) -> EnvResult<CategoricalEnvironment> {
        let dims = Dimensions::new(self.locations, self.age_brackets, self.risk_classes)?;
        let mixing = MixingModel::new(self.mixing_weights)?;
        CategoricalEnvironmentBuilder::new(dims, mixing)
            .age_window(self.min_age, self.max_age)
            .indexed_sex(self.indexed_sex)
            .exclude_partnered(self.exclude_partnered)
            .fallback(self.fallback)
            .weight_by_occupancy(self.weight_by_occupancy)
            .build()
    }
}
