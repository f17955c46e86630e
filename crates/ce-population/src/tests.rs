//! Unit tests for ce-population.

#[cfg(test)]
mod store {
    use ce_core::AgentId;

    use crate::{Person, PersonStore, Sex};

    fn woman(age: f32, location: usize) -> Person {
        Person { age, sex: Sex::Female, location, risk_class: 0, partnered: false }
    }

    #[test]
    fn push_assigns_sequential_ids() {
        let mut store = PersonStore::new();
        assert!(store.is_empty());
        assert_eq!(store.push(woman(20.0, 0)), AgentId(0));
        assert_eq!(store.push(woman(21.0, 1)), AgentId(1));
        assert_eq!(store.count, 2);
        assert_eq!(store.location, vec![0, 1]);
    }

    #[test]
    fn person_gathers_row() {
        let mut store = PersonStore::new();
        let p = Person { age: 33.5, sex: Sex::Male, location: 4, risk_class: 1, partnered: true };
        let id = store.push(p);
        assert_eq!(store.person(id), p);
        assert!(store.contains(id));
        assert!(!store.contains(AgentId(1)));
    }

    #[test]
    fn agent_ids_ascending() {
        let mut store = PersonStore::new();
        for i in 0..4 {
            store.push(woman(20.0 + i as f32, 0));
        }
        let ids: Vec<_> = store.agent_ids().collect();
        assert_eq!(ids, vec![AgentId(0), AgentId(1), AgentId(2), AgentId(3)]);
    }

    #[test]
    fn age_by_shifts_everyone() {
        let mut store = PersonStore::new();
        store.push(woman(14.5, 0));
        store.push(woman(39.0, 0));
        store.age_by(1.0);
        assert_eq!(store.age, vec![15.5, 40.0]);
    }

    #[test]
    fn sex_labels() {
        assert_eq!(Sex::Female.to_string(), "female");
        assert_eq!(Sex::Male.as_str(), "male");
    }
}

#[cfg(test)]
mod builder {
    use ce_core::AgentId;

    use crate::{Person, PersonStoreBuilder};

    #[test]
    fn build_matches_lengths() {
        let (store, rngs) = PersonStoreBuilder::new(42)
            .people((0..10).map(|i| Person { age: i as f32, ..Person::default() }))
            .build();
        assert_eq!(store.count, 10);
        assert_eq!(rngs.len(), 10);
        assert_eq!(store.age.len(), 10);
        assert_eq!(store.partnered.len(), 10);
    }

    #[test]
    fn rng_seeds_are_deterministic() {
        let (_, mut a) = PersonStoreBuilder::new(7).people(vec![Person::default(); 3]).build();
        let (_, mut b) = PersonStoreBuilder::new(7).people(vec![Person::default(); 3]).build();
        let x = a.get_mut(AgentId(2)).unit();
        let y = b.get_mut(AgentId(2)).unit();
        assert_eq!(x, y);
    }

    #[test]
    fn grow_to_keeps_existing_state() {
        let (_, mut grown) = PersonStoreBuilder::new(1).people(vec![Person::default(); 2]).build();
        let (_, mut fresh) = PersonStoreBuilder::new(1).people(vec![Person::default(); 5]).build();
        grown.grow_to(5);
        assert_eq!(grown.len(), 5);
        let x = grown.get_mut(AgentId(4)).unit();
        let y = fresh.get_mut(AgentId(4)).unit();
        assert_eq!(x, y, "new agents get the same seed they would have had at build time");
    }
}
