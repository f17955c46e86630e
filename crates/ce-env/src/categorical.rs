//! `CategoricalEnvironment` — index + mixing model behind one facade.

use ce_core::{AgentId, AgentRng, CategoryKey, Dimensions, Step};
use ce_index::{AgentHandle, CategoricalIndex};
use ce_mixing::{FrequencyTable, MixingModel};
use ce_population::PersonStore;
use tracing::debug;

use crate::{AgeBrackets, AgeWindow, Eligibility, EnvError, EnvResult, Environment, FallbackPolicy};

/// Indexes the eligible population by (location, age bracket, risk class)
/// and answers "find me a partner" queries.
///
/// Create via [`CategoricalEnvironmentBuilder`][crate::CategoricalEnvironmentBuilder].
pub struct CategoricalEnvironment {
    pub(crate) index:               CategoricalIndex,
    pub(crate) brackets:            AgeBrackets,
    pub(crate) eligibility:         Eligibility,
    pub(crate) mixing:              MixingModel,
    pub(crate) fallback:            FallbackPolicy,
    pub(crate) weight_by_occupancy: bool,
}

impl CategoricalEnvironment {
    // ── Configuration ─────────────────────────────────────────────────────

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.index.dimensions()
    }

    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    pub fn age_brackets(&self) -> &AgeBrackets {
        &self.brackets
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn set_fallback(&mut self, fallback: FallbackPolicy) {
        self.fallback = fallback;
    }

    pub fn mixing(&self) -> &MixingModel {
        &self.mixing
    }

    pub fn index(&self) -> &CategoricalIndex {
        &self.index
    }

    pub fn min_age(&self) -> f32 {
        self.eligibility.window.min_age()
    }

    pub fn max_age(&self) -> f32 {
        self.eligibility.window.max_age()
    }

    /// Move the lower edge of the eligibility window.  Takes effect at the
    /// next [`update`](Self::update).
    pub fn set_min_age(&mut self, min_age: f32) -> EnvResult<()> {
        self.set_window(AgeWindow::new(min_age, self.max_age())?)
    }

    /// Move the upper edge of the eligibility window.  Takes effect at the
    /// next [`update`](Self::update).
    pub fn set_max_age(&mut self, max_age: f32) -> EnvResult<()> {
        self.set_window(AgeWindow::new(self.min_age(), max_age)?)
    }

    fn set_window(&mut self, window: AgeWindow) -> EnvResult<()> {
        self.brackets = AgeBrackets::new(window, self.brackets.count())?;
        self.eligibility.window = window;
        Ok(())
    }

    /// Replace the configured mixing weights (same number of locations).
    ///
    /// With occupancy weighting enabled the new weights are re-weighted at
    /// the next rebuild.
    pub fn set_mixing_weights(&mut self, weights: Vec<Vec<f64>>) -> EnvResult<()> {
        self.mixing.set_weights(weights)?;
        Ok(())
    }

    // ── Rebuild ───────────────────────────────────────────────────────────

    /// Step of the last completed rebuild.
    pub fn epoch(&self) -> Option<Step> {
        self.index.epoch()
    }

    /// Category for `agent`, or `None` if the agent is not eligible.
    ///
    /// A location or risk class outside the configured range is an error
    /// naming the agent, as is an agent the population does not hold.
    pub fn classify(&self, population: &PersonStore, agent: AgentId) -> EnvResult<Option<CategoryKey>> {
        check_population(population)?;
        if !population.contains(agent) {
            return Err(EnvError::UnknownAgent { agent, count: population.count });
        }
        self.classify_unchecked(population, agent)
    }

    /// `agent` must be below `population.count` and the store consistent.
    fn classify_unchecked(&self, population: &PersonStore, agent: AgentId) -> EnvResult<Option<CategoryKey>> {
        let i = agent.index();
        if !self.eligibility.admits(population.age[i], population.sex[i], population.partnered[i]) {
            return Ok(None);
        }
        let Some(age_bracket) = self.brackets.bracket(population.age[i]) else {
            return Ok(None);
        };
        let key = CategoryKey::new(population.location[i], age_bracket, population.risk_class[i]);
        self.index
            .indexer()
            .check(key)
            .map_err(|source| EnvError::InvalidPerson { agent, source })?;
        Ok(Some(key))
    }

    fn classify_population(&self, population: &PersonStore) -> EnvResult<Vec<(AgentId, CategoryKey)>> {
        #[cfg(not(feature = "parallel"))]
        {
            population
                .agent_ids()
                .filter_map(|agent| {
                    self.classify_unchecked(population, agent)
                        .map(|k| k.map(|k| (agent, k)))
                        .transpose()
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Collect preserves population order, so buckets fill identically
            // to the sequential path.
            (0..population.count as u32)
                .into_par_iter()
                .map(AgentId)
                .filter_map(|agent| {
                    self.classify_unchecked(population, agent)
                        .map(|k| k.map(|k| (agent, k)))
                        .transpose()
                })
                .collect()
        }
    }

    /// Clear the index and refill it from `population` for `step`.
    ///
    /// On error the index is left cleared and every query fails until the
    /// next successful rebuild.
    pub fn update(&mut self, population: &PersonStore, step: Step) -> EnvResult<()> {
        let entries = match check_population(population).and_then(|()| self.classify_population(population)) {
            Ok(e) => e,
            Err(e) => {
                self.index.clear();
                return Err(e);
            }
        };
        self.index.rebuild(step, entries)?;

        if self.weight_by_occupancy {
            let occupancy = self.index.occupancy_by_location()?;
            self.mixing.reweight_by_occupancy(&occupancy)?;
        }

        debug!(
            %step,
            population = population.count,
            indexed = self.index.len(),
            "categorical index rebuilt"
        );
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn num_agents_at_index(&self, location: usize, age_bracket: usize, risk_class: usize) -> EnvResult<usize> {
        Ok(self.index.num_agents_at_index(location, age_bracket, risk_class)?)
    }

    /// Uniform pick from one category; `Ok(None)` if it is empty.
    pub fn random_agent_from_index(
        &self,
        location:    usize,
        age_bracket: usize,
        risk_class:  usize,
        rng:         &mut AgentRng,
    ) -> EnvResult<Option<AgentHandle>> {
        Ok(self.index.random_agent_from_index(location, age_bracket, risk_class, rng)?)
    }

    /// Draw a partner location for an agent at `source`.  Consumes one
    /// uniform draw.
    pub fn sample_target_location(&self, source: usize, rng: &mut AgentRng) -> EnvResult<usize> {
        Ok(self.mixing.sample_target_location(source, rng.unit())?)
    }

    /// Cumulative distribution currently used to pick partner locations for
    /// agents at `source`.
    pub fn mate_location_distribution(&self, source: usize) -> EnvResult<&[f64]> {
        Ok(self.mixing.mate_location_distribution(source)?)
    }

    /// Find a partner in category `(·, age_bracket, risk_class)` for an agent
    /// at `source`.
    ///
    /// Draws a target location from the mixing model, then picks uniformly
    /// from that location's bucket.  An empty bucket is handled by the
    /// configured [`FallbackPolicy`].  A match is recorded in the frequency
    /// matrix as `(source, partner location)`.
    pub fn sample_partner(
        &self,
        source:      usize,
        age_bracket: usize,
        risk_class:  usize,
        rng:         &mut AgentRng,
    ) -> EnvResult<Option<AgentHandle>> {
        let redraws = match self.fallback {
            FallbackPolicy::Redraw { attempts } => attempts,
            FallbackPolicy::NoMatch | FallbackPolicy::OwnLocation => 0,
        };

        for _ in 0..=redraws {
            let target = self.sample_target_location(source, rng)?;
            if let Some(h) = self.index.random_agent_from_index(target, age_bracket, risk_class, rng)? {
                self.mixing.record_observed_pair(source, target)?;
                return Ok(Some(h));
            }
        }

        if self.fallback == FallbackPolicy::OwnLocation {
            if let Some(h) = self.index.random_agent_from_index(source, age_bracket, risk_class, rng)? {
                self.mixing.record_observed_pair(source, source)?;
                return Ok(Some(h));
            }
        }

        Ok(None)
    }

    /// Unwrap `handle` if it came from the current rebuild.
    pub fn resolve(&self, handle: AgentHandle) -> EnvResult<AgentId> {
        Ok(self.index.validate(handle)?)
    }

    // ── Frequencies ───────────────────────────────────────────────────────

    /// Count a match between an agent at `agent_location` and a partner at
    /// `mate_location`.  [`sample_partner`](Self::sample_partner) already
    /// does this; call directly only for matches made by other means.
    pub fn increase_count_mates_in_locations(&self, agent_location: usize, mate_location: usize) -> EnvResult<()> {
        Ok(self.mixing.record_observed_pair(agent_location, mate_location)?)
    }

    /// Row-normalise the accumulated mate-location counts and reset them.
    pub fn normalize_mate_location_frequencies(&self) -> FrequencyTable {
        self.mixing.normalize_frequencies()
    }
}

/// Every SoA column must hold exactly `count` entries.
fn check_population(population: &PersonStore) -> EnvResult<()> {
    let columns = [
        ("ages", population.age.len()),
        ("sexes", population.sex.len()),
        ("locations", population.location.len()),
        ("risk classes", population.risk_class.len()),
        ("partnership flags", population.partnered.len()),
    ];
    for (what, got) in columns {
        if got != population.count {
            return Err(EnvError::PopulationMismatch { expected: population.count, got, what });
        }
    }
    Ok(())
}

impl Environment for CategoricalEnvironment {
    fn update(&mut self, population: &PersonStore, step: Step) -> EnvResult<()> {
        CategoricalEnvironment::update(self, population, step)
    }

    fn describe_population(&self) -> String {
        self.index.describe_population()
    }

    fn describe_mate_location_frequencies(&self) -> String {
        self.mixing.describe_frequencies()
    }
}
