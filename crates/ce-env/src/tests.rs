//! Unit tests for ce-env.

use ce_core::{AgentId, AgentRng, Dimensions, Step};
use ce_mixing::MixingModel;
use ce_population::{Person, PersonStore, PersonStoreBuilder, Sex};

use crate::{CategoricalEnvironment, CategoricalEnvironmentBuilder, EnvError, FallbackPolicy};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn woman(age: f32, location: usize) -> Person {
    Person { age, sex: Sex::Female, location, risk_class: 0, partnered: false }
}

fn man(age: f32, location: usize) -> Person {
    Person { age, sex: Sex::Male, location, risk_class: 0, partnered: false }
}

fn population(people: Vec<Person>) -> PersonStore {
    PersonStoreBuilder::new(7).people(people).build().0
}

fn env_with(weights: Vec<Vec<f64>>, fallback: FallbackPolicy) -> CategoricalEnvironment {
    let l = weights.len();
    CategoricalEnvironmentBuilder::new(Dimensions::new(l, 1, 1).unwrap(), MixingModel::new(weights).unwrap())
        .fallback(fallback)
        .build()
        .unwrap()
}

fn rng() -> AgentRng {
    AgentRng::new(99, AgentId(0))
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use crate::{AgeBrackets, AgeWindow, EnvConfig};

    #[test]
    fn age_window_is_half_open() {
        let w = AgeWindow::new(15.0, 40.0).unwrap();
        assert!(w.contains(15.0));
        assert!(w.contains(39.9));
        assert!(!w.contains(40.0));
        assert!(!w.contains(14.9));
    }

    #[test]
    fn empty_or_negative_window_rejected() {
        assert!(matches!(AgeWindow::new(40.0, 15.0), Err(EnvError::Config(_))));
        assert!(matches!(AgeWindow::new(20.0, 20.0), Err(EnvError::Config(_))));
        assert!(matches!(AgeWindow::new(-1.0, 20.0), Err(EnvError::Config(_))));
        assert!(matches!(AgeWindow::new(0.0, f32::INFINITY), Err(EnvError::Config(_))));
    }

    #[test]
    fn brackets_split_window_evenly() {
        let b = AgeBrackets::new(AgeWindow::new(15.0, 40.0).unwrap(), 5).unwrap();
        assert_eq!(b.width(), 5.0);
        assert_eq!(b.bracket(15.0), Some(0));
        assert_eq!(b.bracket(19.9), Some(0));
        assert_eq!(b.bracket(20.0), Some(1));
        assert_eq!(b.bracket(39.99), Some(4));
        assert_eq!(b.bracket(40.0), None);
        assert_eq!(b.bracket(12.0), None);
    }

    #[test]
    fn zero_brackets_rejected() {
        let w = AgeWindow::new(15.0, 40.0).unwrap();
        assert!(matches!(AgeBrackets::new(w, 0), Err(EnvError::Config(_))));
    }

    #[test]
    fn fallback_display() {
        assert_eq!(FallbackPolicy::NoMatch.to_string(), "no-match");
        assert_eq!(FallbackPolicy::Redraw { attempts: 3 }.to_string(), "redraw(3)");
        assert_eq!(FallbackPolicy::OwnLocation.to_string(), "own-location");
    }

    #[test]
    fn default_config_builds() {
        let env = EnvConfig::default().build().unwrap();
        assert_eq!(env.dimensions().bucket_count(), 1);
        assert_eq!(env.min_age(), 15.0);
        assert_eq!(env.max_age(), 40.0);
        assert_eq!(env.fallback(), FallbackPolicy::NoMatch);
        assert_eq!(env.epoch(), None);
    }

    #[test]
    fn mixing_size_must_match_locations() {
        let cfg = EnvConfig { locations: 3, ..EnvConfig::default() };
        let err = cfg.build().err().unwrap();
        assert!(matches!(err, EnvError::Config(ref m) if m.contains("1 locations")), "{err}");
    }

    #[test]
    fn zero_dimension_rejected() {
        let cfg = EnvConfig { risk_classes: 0, ..EnvConfig::default() };
        assert!(matches!(cfg.build(), Err(EnvError::Dimensions(_))));
    }

    #[test]
    fn invalid_mixing_rejected() {
        let cfg = EnvConfig { mixing_weights: vec![vec![0.0]], ..EnvConfig::default() };
        assert!(matches!(cfg.build(), Err(EnvError::Mixing(_))));
    }
}

#[cfg(test)]
mod rebuild_tests {
    use super::*;
    use crate::Environment;
    use ce_index::IndexError;

    #[test]
    fn only_eligible_people_are_indexed() {
        let mut partnered = woman(25.0, 0);
        partnered.partnered = true;
        let pop = population(vec![
            woman(25.0, 0), // indexed
            man(25.0, 0),   // wrong sex
            woman(14.0, 0), // too young
            woman(40.0, 0), // upper bound excluded
            partnered,      // admitted unless partnered people are excluded
        ]);

        let mut env = env_with(vec![vec![1.0]], FallbackPolicy::NoMatch);
        env.update(&pop, Step(0)).unwrap();
        assert_eq!(env.num_agents_at_index(0, 0, 0).unwrap(), 2);

        let mut strict = CategoricalEnvironmentBuilder::new(
            Dimensions::new(1, 1, 1).unwrap(),
            MixingModel::new(vec![vec![1.0]]).unwrap(),
        )
        .exclude_partnered(true)
        .build()
        .unwrap();
        strict.update(&pop, Step(0)).unwrap();
        assert_eq!(strict.num_agents_at_index(0, 0, 0).unwrap(), 1);
    }

    #[test]
    fn indexing_everyone_ignores_sex() {
        let pop = population(vec![woman(20.0, 0), man(20.0, 0)]);
        let mut env = CategoricalEnvironmentBuilder::new(
            Dimensions::new(1, 1, 1).unwrap(),
            MixingModel::new(vec![vec![1.0]]).unwrap(),
        )
        .indexed_sex(None)
        .build()
        .unwrap();
        env.update(&pop, Step(0)).unwrap();
        assert_eq!(env.num_agents_at_index(0, 0, 0).unwrap(), 2);
    }

    #[test]
    fn people_land_in_their_age_bracket() {
        let pop = population(vec![woman(16.0, 0), woman(21.0, 0), woman(22.0, 0), woman(39.0, 0)]);
        let mut env = CategoricalEnvironmentBuilder::new(
            Dimensions::new(1, 5, 1).unwrap(),
            MixingModel::new(vec![vec![1.0]]).unwrap(),
        )
        .build()
        .unwrap();
        env.update(&pop, Step(0)).unwrap();
        let counts: Vec<usize> = (0..5).map(|a| env.num_agents_at_index(0, a, 0).unwrap()).collect();
        assert_eq!(counts, vec![1, 2, 0, 0, 1]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let pop = population((0..30).map(|i| woman(15.0 + i as f32 * 0.5, i % 3)).collect());
        let mut env = env_with(vec![vec![1.0; 3]; 3], FallbackPolicy::NoMatch);

        env.update(&pop, Step(3)).unwrap();
        let first: Vec<usize> = (0..3).map(|l| env.num_agents_at_index(l, 0, 0).unwrap()).collect();
        env.update(&pop, Step(3)).unwrap();
        let second: Vec<usize> = (0..3).map(|l| env.num_agents_at_index(l, 0, 0).unwrap()).collect();

        assert_eq!(first, second);
        assert_eq!(first.iter().sum::<usize>(), 30);
    }

    #[test]
    fn rebuild_drops_people_who_moved_or_aged_out() {
        let mut pop = population(vec![woman(39.5, 0), woman(20.0, 1)]);
        let mut env = env_with(vec![vec![1.0, 1.0], vec![1.0, 1.0]], FallbackPolicy::NoMatch);
        env.update(&pop, Step(0)).unwrap();
        assert_eq!(env.num_agents_at_index(0, 0, 0).unwrap(), 1);

        pop.age_by(1.0);
        pop.location[1] = 0;
        env.update(&pop, Step(1)).unwrap();
        assert_eq!(env.num_agents_at_index(0, 0, 0).unwrap(), 1);
        assert_eq!(env.num_agents_at_index(1, 0, 0).unwrap(), 0);
        assert_eq!(env.epoch(), Some(Step(1)));
    }

    #[test]
    fn out_of_range_person_names_agent_and_clears_index() {
        let good = population(vec![woman(20.0, 0)]);
        let bad = population(vec![woman(20.0, 0), woman(20.0, 5)]);
        let mut env = env_with(vec![vec![1.0]], FallbackPolicy::NoMatch);
        env.update(&good, Step(0)).unwrap();

        let err = env.update(&bad, Step(1)).unwrap_err();
        assert!(matches!(err, EnvError::InvalidPerson { agent: AgentId(1), .. }), "{err}");
        assert!(err.to_string().contains("AgentId(1)"));

        assert_eq!(env.epoch(), None);
        assert!(matches!(env.num_agents_at_index(0, 0, 0), Err(EnvError::Index(IndexError::NotBuilt))));
    }

    #[test]
    fn ragged_population_is_rejected_not_indexed() {
        let mut pop = population(vec![woman(20.0, 0), woman(21.0, 0)]);
        let mut env = env_with(vec![vec![1.0]], FallbackPolicy::NoMatch);
        env.update(&pop, Step(0)).unwrap();

        pop.location.pop();
        let err = env.update(&pop, Step(1)).unwrap_err();
        assert!(
            matches!(err, EnvError::PopulationMismatch { expected: 2, got: 1, what: "locations" }),
            "{err}"
        );
        assert_eq!(env.epoch(), None);

        assert!(matches!(
            env.classify(&pop, AgentId(0)),
            Err(EnvError::PopulationMismatch { what: "locations", .. })
        ));
    }

    #[test]
    fn classify_unknown_agent_is_an_error() {
        let pop = population(vec![woman(20.0, 0)]);
        let env = env_with(vec![vec![1.0]], FallbackPolicy::NoMatch);
        assert_eq!(env.classify(&pop, AgentId(0)).unwrap(), Some(ce_core::CategoryKey::new(0, 0, 0)));

        let err = env.classify(&pop, AgentId(5)).unwrap_err();
        assert!(matches!(err, EnvError::UnknownAgent { agent: AgentId(5), count: 1 }), "{err}");
        assert!(err.to_string().contains("AgentId(5)"));
    }

    #[test]
    fn queries_before_first_update_fail() {
        let env = env_with(vec![vec![1.0]], FallbackPolicy::NoMatch);
        assert!(matches!(
            env.sample_partner(0, 0, 0, &mut rng()),
            Err(EnvError::Index(IndexError::NotBuilt))
        ));
    }

    #[test]
    fn age_window_setters_apply_at_next_update() {
        let pop = population(vec![woman(18.0, 0), woman(30.0, 0), woman(45.0, 0)]);
        let mut env = env_with(vec![vec![1.0]], FallbackPolicy::NoMatch);
        env.update(&pop, Step(0)).unwrap();
        assert_eq!(env.num_agents_at_index(0, 0, 0).unwrap(), 2);

        env.set_min_age(25.0).unwrap();
        env.set_max_age(50.0).unwrap();
        assert_eq!(env.num_agents_at_index(0, 0, 0).unwrap(), 2);

        env.update(&pop, Step(1)).unwrap();
        assert_eq!(env.num_agents_at_index(0, 0, 0).unwrap(), 2);
        assert_eq!((env.min_age(), env.max_age()), (25.0, 50.0));
    }

    #[test]
    fn bad_setter_keeps_previous_window() {
        let mut env = env_with(vec![vec![1.0]], FallbackPolicy::NoMatch);
        assert!(env.set_min_age(60.0).is_err());
        assert_eq!(env.min_age(), 15.0);
    }

    #[test]
    fn describe_population_reports_occupied_buckets() {
        let pop = population(vec![woman(20.0, 1), woman(21.0, 1)]);
        let mut env = env_with(vec![vec![1.0, 1.0], vec![1.0, 1.0]], FallbackPolicy::NoMatch);
        env.update(&pop, Step(4)).unwrap();
        let text = Environment::describe_population(&env);
        assert!(text.starts_with("categorical index @ S4: 2 agents"), "{text}");
    }

    #[test]
    fn trait_defaults_are_empty() {
        struct Nothing;
        impl Environment for Nothing {
            fn update(&mut self, _: &PersonStore, _: Step) -> crate::EnvResult<()> {
                Ok(())
            }
        }
        let mut n = Nothing;
        n.update(&PersonStore::new(), Step(0)).unwrap();
        assert!(n.describe_population().is_empty());
        assert!(n.describe_mate_location_frequencies().is_empty());
    }
}

#[cfg(test)]
mod sampling_tests {
    use super::*;
    use ce_index::IndexError;

    /// Two women at location 0 and five at location 2; nobody at 1.
    fn three_locations() -> PersonStore {
        let mut people: Vec<Person> = (0..2).map(|_| woman(20.0, 0)).collect();
        people.extend((0..5).map(|_| woman(25.0, 2)));
        population(people)
    }

    #[test]
    fn partners_come_from_the_sampled_location() {
        let pop = three_locations();
        let mut env = env_with(
            vec![vec![0.0, 0.0, 1.0], vec![1.0, 1.0, 1.0], vec![1.0, 0.0, 0.0]],
            FallbackPolicy::NoMatch,
        );
        env.update(&pop, Step(0)).unwrap();

        let mut r = rng();
        for _ in 0..200 {
            let h = env.sample_partner(0, 0, 0, &mut r).unwrap().unwrap();
            let agent = env.resolve(h).unwrap();
            assert_eq!(pop.location[agent.index()], 2);
        }
        let table = env.normalize_mate_location_frequencies();
        assert_eq!(table.get(0, 2), Some(1.0));
        assert_eq!(table.row_total(0), Some(200));
    }

    #[test]
    fn target_draw_follows_cumulative_row() {
        let pop = three_locations();
        let mut env = env_with(vec![vec![0.1, 0.3, 0.6]; 3], FallbackPolicy::NoMatch);
        env.update(&pop, Step(0)).unwrap();

        let cdf = env.mate_location_distribution(1).unwrap();
        assert!((cdf[0] - 0.1).abs() < 1e-9);
        assert!((cdf[1] - 0.4).abs() < 1e-9);
        assert_eq!(cdf[2], 1.0);

        let mut r = rng();
        let mut hits = [0usize; 3];
        for _ in 0..10_000 {
            hits[env.sample_target_location(1, &mut r).unwrap()] += 1;
        }
        assert!((800..1200).contains(&hits[0]), "{hits:?}");
        assert!((2700..3300).contains(&hits[1]), "{hits:?}");
        assert!((5600..6400).contains(&hits[2]), "{hits:?}");
    }

    #[test]
    fn empty_target_is_no_match_by_default() {
        let pop = three_locations();
        let mut env = env_with(
            vec![vec![0.0, 1.0, 0.0], vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]],
            FallbackPolicy::NoMatch,
        );
        env.update(&pop, Step(0)).unwrap();

        for _ in 0..20 {
            assert_eq!(env.sample_partner(0, 0, 0, &mut rng()).unwrap(), None);
        }
        assert_eq!(env.mixing().frequencies().total(), 0);
    }

    #[test]
    fn redraw_finds_partner_elsewhere() {
        let pop = three_locations();
        let mut env = env_with(
            vec![vec![0.0, 1.0, 1.0], vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]],
            FallbackPolicy::Redraw { attempts: 40 },
        );
        env.update(&pop, Step(0)).unwrap();

        let mut r = rng();
        for _ in 0..50 {
            let h = env.sample_partner(0, 0, 0, &mut r).unwrap().unwrap();
            assert_eq!(pop.location[env.resolve(h).unwrap().index()], 2);
        }
        assert_eq!(env.mixing().frequencies().count(0, 1).unwrap(), 0);
        assert_eq!(env.mixing().frequencies().count(0, 2).unwrap(), 50);
    }

    #[test]
    fn redraw_with_maximum_attempts_still_draws() {
        let pop = population(vec![woman(20.0, 0)]);
        let mut env = env_with(vec![vec![1.0]], FallbackPolicy::Redraw { attempts: u32::MAX });
        env.update(&pop, Step(0)).unwrap();

        let h = env.sample_partner(0, 0, 0, &mut rng()).unwrap().unwrap();
        assert_eq!(env.resolve(h).unwrap(), AgentId(0));
    }

    #[test]
    fn own_location_fallback_records_own_pair() {
        let pop = three_locations();
        let mut env = env_with(
            vec![vec![0.0, 1.0, 0.0], vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]],
            FallbackPolicy::OwnLocation,
        );
        env.update(&pop, Step(0)).unwrap();

        let h = env.sample_partner(0, 0, 0, &mut rng()).unwrap().unwrap();
        assert_eq!(pop.location[env.resolve(h).unwrap().index()], 0);
        assert_eq!(env.mixing().frequencies().count(0, 0).unwrap(), 1);

        // Own location empty too: no match.
        assert_eq!(env.sample_partner(1, 0, 0, &mut rng()).unwrap(), None);
    }

    #[test]
    fn sampling_is_reproducible_for_a_seed() {
        let pop = three_locations();
        let mut env = env_with(vec![vec![1.0, 1.0, 1.0]; 3], FallbackPolicy::Redraw { attempts: 2 });
        env.update(&pop, Step(0)).unwrap();

        let run = |env: &CategoricalEnvironment| -> Vec<Option<AgentId>> {
            let mut r = rng();
            (0..25)
                .map(|_| env.sample_partner(1, 0, 0, &mut r).unwrap().map(|h| h.agent))
                .collect()
        };
        assert_eq!(run(&env), run(&env));
    }

    #[test]
    fn handles_go_stale_after_rebuild() {
        let pop = three_locations();
        let mut env = env_with(vec![vec![1.0, 0.0, 0.0]; 3], FallbackPolicy::NoMatch);
        env.update(&pop, Step(0)).unwrap();
        let h = env.random_agent_from_index(0, 0, 0, &mut rng()).unwrap().unwrap();
        assert!(env.resolve(h).is_ok());

        env.update(&pop, Step(1)).unwrap();
        let err = env.resolve(h).unwrap_err();
        assert!(matches!(err, EnvError::Index(IndexError::StaleHandle { current: Step(1), .. })));
    }

    #[test]
    fn occupancy_weighting_skips_empty_locations() {
        let pop = three_locations();
        let mut env = CategoricalEnvironmentBuilder::new(
            Dimensions::new(3, 1, 1).unwrap(),
            MixingModel::new(vec![vec![1.0, 1.0, 1.0]; 3]).unwrap(),
        )
        .weight_by_occupancy(true)
        .build()
        .unwrap();
        env.update(&pop, Step(0)).unwrap();

        // Occupancy (2, 0, 5) over uniform weights.
        let cdf = env.mate_location_distribution(0).unwrap();
        assert!((cdf[0] - 2.0 / 7.0).abs() < 1e-9);
        assert!((cdf[1] - 2.0 / 7.0).abs() < 1e-9);
        assert_eq!(cdf[2], 1.0);

        let mut r = rng();
        for _ in 0..500 {
            assert!(env.sample_partner(1, 0, 0, &mut r).unwrap().is_some());
        }
    }

    #[test]
    fn set_mixing_weights_takes_effect_immediately() {
        let pop = three_locations();
        let mut env = env_with(vec![vec![1.0, 0.0, 0.0]; 3], FallbackPolicy::NoMatch);
        env.update(&pop, Step(0)).unwrap();
        env.set_mixing_weights(vec![vec![0.0, 0.0, 1.0]; 3]).unwrap();
        assert_eq!(env.sample_target_location(0, &mut rng()).unwrap(), 2);

        assert!(matches!(env.set_mixing_weights(vec![vec![1.0]]), Err(EnvError::Mixing(_))));
    }

    #[test]
    fn manual_pair_recording_and_normalization() {
        let env = env_with(vec![vec![1.0, 1.0], vec![1.0, 1.0]], FallbackPolicy::NoMatch);
        env.increase_count_mates_in_locations(0, 1).unwrap();
        env.increase_count_mates_in_locations(0, 1).unwrap();
        env.increase_count_mates_in_locations(0, 0).unwrap();
        assert!(env.increase_count_mates_in_locations(0, 2).is_err());

        let table = env.normalize_mate_location_frequencies();
        assert!((table.get(0, 1).unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(table.row_total(1), Some(0));
        assert_eq!(env.mixing().frequencies().total(), 0);
    }
}
