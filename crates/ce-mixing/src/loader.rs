//! CSV mixing-matrix loader.
//!
//! # CSV format
//!
//! One row per non-zero matrix entry.  Entries that do not appear are zero.
//!
//! ```csv
//! source,target,weight
//! 0,0,0.8
//! 0,1,0.2
//! 1,0,0.1
//! 1,1,0.9
//! ```
//!
//! The matrix size is supplied by the caller (the configured number of
//! locations), not inferred from the file, so a location with no rows is
//! reported as a zero row instead of silently shrinking the matrix.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{MixingError, MixingMatrix, MixingResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MixingRecord {
    source: usize,
    target: usize,
    weight: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an `locations × locations` mixing matrix from a CSV file.
pub fn load_mixing_csv(path: &Path, locations: usize) -> MixingResult<MixingMatrix> {
    let file = std::fs::File::open(path).map_err(MixingError::Io)?;
    load_mixing_reader(file, locations)
}

/// Like [`load_mixing_csv`] but accepts any `Read` source.
pub fn load_mixing_reader<R: Read>(reader: R, locations: usize) -> MixingResult<MixingMatrix> {
    let mut rows = vec![vec![0.0_f64; locations]; locations];
    let mut seen = vec![false; locations * locations];

    let mut csv_reader = csv::Reader::from_reader(reader);
    for (line, result) in csv_reader.deserialize::<MixingRecord>().enumerate() {
        let rec = result.map_err(|e| MixingError::Parse(e.to_string()))?;
        if rec.source >= locations || rec.target >= locations {
            return Err(MixingError::Parse(format!(
                "record {}: entry ({}, {}) outside {locations} locations",
                line + 1,
                rec.source,
                rec.target
            )));
        }
        let slot = rec.source * locations + rec.target;
        if seen[slot] {
            return Err(MixingError::Parse(format!(
                "record {}: duplicate entry ({}, {})",
                line + 1,
                rec.source,
                rec.target
            )));
        }
        seen[slot] = true;
        rows[rec.source][rec.target] = rec.weight;
    }

    MixingMatrix::from_rows(rows)
}
