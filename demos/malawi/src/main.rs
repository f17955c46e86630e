//! malawi — small demo for the rust_ce categorical environment.
//!
//! Builds a synthetic adult population spread over three districts loosely
//! modelled on Malawi's regions, then runs yearly steps of:
//!
//!   rebuild index → men look for partners → record diagnostics → age
//!
//! Set `RUST_LOG=debug` to see per-step rebuild logs.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use ce_core::{AgentId, SimRng, StepClock};
use ce_env::{EnvConfig, Environment};
use ce_mixing::load_mixing_reader;
use ce_output::{CsvWriter, DiagnosticsRecorder};
use ce_population::{Person, PersonStore, PersonStoreBuilder, Sex};

// ── Constants ─────────────────────────────────────────────────────────────────

const POPULATION:        usize = 3_000;
const SEED:              u64   = 42;
const START_YEAR:        i32   = 2000;
const YEARS:             u64   = 10;
const SEEK_PROBABILITY:  f64   = 0.35;
const BREAKUP_RATE:      f64   = 0.20;
const ENTRANTS_PER_YEAR: usize = 90;

// ── Embedded inputs ───────────────────────────────────────────────────────────

// Mixing weights are loaded separately below.
const CONFIG_JSON: &str = r#"{
    "locations":         3,
    "age_brackets":      5,
    "risk_classes":      2,
    "min_age":           15.0,
    "max_age":           50.0,
    "indexed_sex":       "female",
    "exclude_partnered": true,
    "fallback":          { "policy": "redraw", "attempts": 2 },
    "weight_by_occupancy": true
}"#;

// 0 = Northern, 1 = Central, 2 = Southern.  Missing pairs weigh 0.
const MIXING_CSV: &str = "\
source,target,weight\n\
0,0,0.80\n\
0,1,0.15\n\
0,2,0.05\n\
1,0,0.10\n\
1,1,0.75\n\
1,2,0.15\n\
2,1,0.20\n\
2,2,0.80\n\
";

// ── Synthetic population ──────────────────────────────────────────────────────

fn random_person(rng: &mut SimRng, min_age: f32, max_age: f32) -> Person {
    Person {
        age:        rng.gen_range(min_age..max_age),
        sex:        if rng.gen_bool(0.5) { Sex::Female } else { Sex::Male },
        location:   rng.gen_range(0..3),
        risk_class: usize::from(rng.gen_bool(0.25)),
        partnered:  false,
    }
}

fn partnered_count(store: &PersonStore) -> usize {
    store.partnered.iter().filter(|&&p| p).count()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 1. Configuration: JSON record + CSV mixing weights.
    let mut config: EnvConfig = serde_json::from_str(CONFIG_JSON)?;
    let matrix = load_mixing_reader(Cursor::new(MIXING_CSV), config.locations)?;
    config.mixing_weights = (0..matrix.size())
        .map(|i| matrix.weights_row(i).map(|row| row.to_vec()))
        .collect::<Result<_, _>>()?;
    let mut env = config.build()?;

    // 2. Population.
    let mut sim_rng = SimRng::new(SEED);
    let people: Vec<Person> = (0..POPULATION).map(|_| random_person(&mut sim_rng, 10.0, 60.0)).collect();
    let (mut store, mut rngs) = PersonStoreBuilder::new(SEED).people(people).build();
    info!(population = store.count, seed = SEED, "synthetic population built");

    // 3. Output.
    let out_dir = Path::new("output/malawi");
    std::fs::create_dir_all(out_dir)?;
    let mut recorder = DiagnosticsRecorder::new(CsvWriter::new(out_dir)?);

    // 4. Yearly loop.  `couples` holds every live partnership as (man, woman).
    let mut couples: Vec<(AgentId, AgentId)> = Vec::new();
    let mut clock = StepClock::new(START_YEAR);
    let t0 = Instant::now();
    for _ in 0..YEARS {
        let step = clock.current_step;
        env.update(&store, step)?;
        recorder.record_population(env.index(), step, clock.year());

        // Men in the window look for a partner among indexed women.
        let mut matches: Vec<(AgentId, AgentId)> = Vec::new();
        for man in store.agent_ids() {
            let i = man.index();
            if store.sex[i] != Sex::Male || store.partnered[i] {
                continue;
            }
            let Some(age_bracket) = env.age_brackets().bracket(store.age[i]) else {
                continue;
            };
            let rng = rngs.get_mut(man);
            if !rng.gen_bool(SEEK_PROBABILITY) {
                continue;
            }
            if let Some(handle) = env.sample_partner(store.location[i], age_bracket, store.risk_class[i], rng)? {
                matches.push((man, env.resolve(handle)?));
            }
        }

        // A woman may be drawn twice in one year; the first match wins.
        let mut formed = 0usize;
        for (man, woman) in matches {
            if store.partnered[woman.index()] || store.partnered[man.index()] {
                continue;
            }
            store.partnered[woman.index()] = true;
            store.partnered[man.index()] = true;
            couples.push((man, woman));
            formed += 1;
        }

        let frequencies = env.normalize_mate_location_frequencies();
        recorder.record_frequencies(&frequencies, step, clock.year());

        info!(
            year = clock.year(),
            indexed = env.index().len(),
            formed,
            couples = couples.len(),
            partnered = partnered_count(&store),
            "step complete"
        );
        tracing::debug!("\n{}", env.describe_population());

        // Breakups, ageing and new entrants for the next year.
        // A breakup frees both partners.
        couples.retain(|&(man, woman)| {
            if !sim_rng.gen_bool(BREAKUP_RATE) {
                return true;
            }
            store.partnered[man.index()] = false;
            store.partnered[woman.index()] = false;
            false
        });
        store.age_by(1.0);
        for _ in 0..ENTRANTS_PER_YEAR {
            store.push(random_person(&mut sim_rng, 15.0, 16.0));
        }
        rngs.grow_to(store.count);
        clock.advance();
    }
    recorder.finish();

    if let Some(e) = recorder.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", t0.elapsed().as_secs_f64());
    println!("  population  : {}", store.count);
    println!("  couples     : {}", couples.len());
    println!("  partnered   : {}", partnered_count(&store));
    println!("  output      : {}", out_dir.display());

    Ok(())
}
