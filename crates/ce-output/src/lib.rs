//! `ce-output` — diagnostics writers for the rust_ce categorical environment.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                      |
//! |-----------|---------|----------------------------------------------------|
//! | *(none)*  | CSV     | `population.csv`, `mate_location_frequencies.csv`  |
//! | `sqlite`  | SQLite  | `diagnostics.db`                                   |
//!
//! Both backends implement [`DiagnosticsWriter`] and are driven by
//! [`DiagnosticsRecorder`], which turns a rebuilt [`CategoricalIndex`] and a
//! normalised [`FrequencyTable`] into rows.
//!
//! [`CategoricalIndex`]: ce_index::CategoricalIndex
//! [`FrequencyTable`]: ce_mixing::FrequencyTable
//!
//! # Usage
//!
//! ```rust,ignore
//! use ce_output::{CsvWriter, DiagnosticsRecorder};
//!
//! let mut rec = DiagnosticsRecorder::new(CsvWriter::new(Path::new("./output"))?);
//! rec.record_population(env.index(), clock.current_step, clock.year());
//! rec.record_frequencies(&env.normalize_mate_location_frequencies(), step, year);
//! rec.finish();
//! if let Some(e) = rec.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::DiagnosticsRecorder;
pub use row::{FrequencyRow, PopulationRow};
pub use writer::DiagnosticsWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
