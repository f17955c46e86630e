//! Core population storage: `PersonStore` (SoA data) and `AgentRngs`
//! (per-agent RNG).
//!
//! # Why two structs?
//!
//! A mating pass needs `&CategoricalEnvironment` + `&PersonStore` (shared
//! reads) and `&mut AgentRng` for the querying agent at the same time.
//! Keeping RNGs out of the store lets both borrows coexist:
//!
//! ```ignore
//! for agent in store.agent_ids() {
//!     let rng = rngs.get_mut(agent);
//!     let partner = env.sample_partner(store.location[agent.index()], 0, 0, rng)?;
//! }
//! ```

use ce_core::{AgentId, AgentRng};

use crate::{Person, Sex};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`PersonStore`] to allow
/// simultaneous `&mut AgentRngs` + `&PersonStore` borrows.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
    seed:      u64,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let mut rngs = Self { inner: Vec::with_capacity(count), seed: global_seed };
        rngs.grow_to(count);
        rngs
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    /// Seed RNGs for newly appended agents until `len() == count`.
    ///
    /// Existing RNG state is untouched, so a growing population does not
    /// perturb draws for agents that were already present.
    pub fn grow_to(&mut self, count: usize) {
        for i in self.inner.len()..count {
            self.inner.push(AgentRng::new(self.seed, AgentId(i as u32)));
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── PersonStore ───────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for the live population.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let loc = store.location[agent.index()];  // O(1), cache-friendly
/// ```
///
/// Fields are `pub` so the host engine can mutate ages, locations and
/// partnership state between steps without going through accessors.
#[derive(Clone, Debug, Default)]
pub struct PersonStore {
    /// Number of persons.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Age in years.
    pub age: Vec<f32>,

    pub sex: Vec<Sex>,

    /// Categorical location id.
    pub location: Vec<usize>,

    /// Socio-behavioural risk class.
    pub risk_class: Vec<usize>,

    /// `true` while in a regular partnership.
    pub partnered: Vec<bool>,
}

impl PersonStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if there are no persons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Append one person and return its id.
    pub fn push(&mut self, person: Person) -> AgentId {
        let id = AgentId(self.count as u32);
        self.age.push(person.age);
        self.sex.push(person.sex);
        self.location.push(person.location);
        self.risk_class.push(person.risk_class);
        self.partnered.push(person.partnered);
        self.count += 1;
        id
    }

    /// Gather one person's attributes into a row.
    ///
    /// # Panics
    /// Panics if `agent` is out of bounds.
    pub fn person(&self, agent: AgentId) -> Person {
        let i = agent.index();
        Person {
            age:        self.age[i],
            sex:        self.sex[i],
            location:   self.location[i],
            risk_class: self.risk_class[i],
            partnered:  self.partnered[i],
        }
    }

    /// `true` if `agent` indexes a stored person.
    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Add `years` to every person's age.
    pub fn age_by(&mut self, years: f32) {
        for a in &mut self.age {
            *a += years;
        }
    }
}
