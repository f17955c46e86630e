//! Observed mate-location frequencies.
//!
//! Counters are `AtomicU64` so that many sampling threads can record matches
//! through a shared `&FrequencyMatrix` during the query phase.  Relaxed
//! ordering is enough: counts are only read after the phase ends.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{MixingError, MixingResult};

// ── FrequencyMatrix ───────────────────────────────────────────────────────────

/// L×L counts of (source location, partner location) pairs chosen during
/// sampling.
#[derive(Debug)]
pub struct FrequencyMatrix {
    size:   usize,
    counts: Vec<AtomicU64>,
}

impl FrequencyMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            counts: (0..size * size).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    fn slot(&self, source: usize, target: usize) -> MixingResult<usize> {
        for location in [source, target] {
            if location >= self.size {
                return Err(MixingError::LocationOutOfRange { location, size: self.size });
            }
        }
        Ok(source * self.size + target)
    }

    /// Increment the `(source, target)` counter.
    pub fn record(&self, source: usize, target: usize) -> MixingResult<()> {
        let slot = self.slot(source, target)?;
        self.counts[slot].fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn count(&self, source: usize, target: usize) -> MixingResult<u64> {
        let slot = self.slot(source, target)?;
        Ok(self.counts[slot].load(Ordering::Relaxed))
    }

    /// Sum over every entry; equals the number of `record` calls since the
    /// last reset.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Row-major copy of the current counts.
    pub fn snapshot(&self) -> Vec<u64> {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for c in &self.counts {
            c.store(0, Ordering::Relaxed);
        }
    }

    /// Take the accumulated counts (resetting them) and convert each row into
    /// proportions.
    pub fn normalize(&self) -> FrequencyTable {
        let counts: Vec<u64> = self.counts.iter().map(|c| c.swap(0, Ordering::Relaxed)).collect();
        FrequencyTable::from_counts(self.size, &counts)
    }

    /// Plain-text table of the current counts, one row per source location.
    pub fn describe(&self) -> String {
        let counts = self.snapshot();
        let mut out = String::new();
        let _ = writeln!(out, "mate location frequencies ({} pairs)", self.total());
        for row in counts.chunks(self.size.max(1)) {
            let cells: Vec<String> = row.iter().map(|n| format!("{n:>6}")).collect();
            let _ = writeln!(out, "{}", cells.join(" "));
        }
        out
    }
}

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Row-normalised view of a [`FrequencyMatrix`]: entry `(i, j)` is the share
/// of matches for agents at location `i` whose partner was at location `j`.
///
/// Rows with no recorded matches are all zero.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTable {
    size:        usize,
    proportions: Vec<f64>,
    row_totals:  Vec<u64>,
}

impl FrequencyTable {
    fn from_counts(size: usize, counts: &[u64]) -> Self {
        let mut proportions = vec![0.0; size * size];
        let mut row_totals = vec![0u64; size];
        for i in 0..size {
            let row = &counts[i * size..(i + 1) * size];
            let total: u64 = row.iter().sum();
            row_totals[i] = total;
            if total > 0 {
                for (j, &n) in row.iter().enumerate() {
                    proportions[i * size + j] = n as f64 / total as f64;
                }
            }
        }
        Self { size, proportions, row_totals }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Proportion for `(source, target)`; `None` if either is out of range.
    pub fn get(&self, source: usize, target: usize) -> Option<f64> {
        (source < self.size && target < self.size)
            .then(|| self.proportions[source * self.size + target])
    }

    pub fn row(&self, source: usize) -> Option<&[f64]> {
        (source < self.size).then(|| &self.proportions[source * self.size..(source + 1) * self.size])
    }

    /// Number of matches recorded for `source` before normalisation.
    pub fn row_total(&self, source: usize) -> Option<u64> {
        self.row_totals.get(source).copied()
    }

    /// `(source, target, proportion)` for every cell, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.proportions
            .iter()
            .enumerate()
            .map(|(k, &p)| (k / self.size, k % self.size, p))
    }
}

impl std::fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.proportions.chunks(self.size.max(1)) {
            let cells: Vec<String> = row.iter().map(|p| format!("{p:.3}")).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
