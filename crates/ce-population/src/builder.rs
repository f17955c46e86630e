//! Fluent builder for constructing `PersonStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use ce_population::{Person, PersonStoreBuilder, Sex};
//!
//! let (store, rngs) = PersonStoreBuilder::new(/*seed=*/ 42)
//!     .person(Person { age: 22.0, sex: Sex::Female, location: 3, risk_class: 0, partnered: false })
//!     .person(Person { age: 31.0, sex: Sex::Male,   location: 1, risk_class: 1, partnered: false })
//!     .build();
//!
//! assert_eq!(store.count, 2);
//! assert_eq!(rngs.len(),  2);
//! ```

use crate::{AgentRngs, Person, PersonStore};

/// Fluent builder for [`PersonStore`] + [`AgentRngs`].
pub struct PersonStoreBuilder {
    seed:  u64,
    store: PersonStore,
}

impl PersonStoreBuilder {
    /// Create an empty builder using `seed` as the global RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, store: PersonStore::new() }
    }

    /// Append one person.
    pub fn person(mut self, person: Person) -> Self {
        self.store.push(person);
        self
    }

    /// Append every person yielded by `people`, in order.
    pub fn people<I: IntoIterator<Item = Person>>(mut self, people: I) -> Self {
        for p in people {
            self.store.push(p);
        }
        self
    }

    /// Construct `PersonStore` and a matching `AgentRngs`.
    pub fn build(self) -> (PersonStore, AgentRngs) {
        let rngs = AgentRngs::new(self.store.count, self.seed);
        (self.store, rngs)
    }
}
