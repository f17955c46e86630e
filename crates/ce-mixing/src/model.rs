//! `MixingModel` — target-location sampling plus match bookkeeping.

use tracing::{debug, info, warn};

use crate::matrix::{check_draw, cumulative_row, sample_cdf};
use crate::{FrequencyMatrix, FrequencyTable, MixingError, MixingMatrix, MixingResult};

/// Owns the static mixing matrix, the distribution currently used for
/// sampling, and the observed-frequency counters.
///
/// The *effective* distribution equals the static one unless
/// [`reweight_by_occupancy`](Self::reweight_by_occupancy) has been applied
/// since the last [`set_weights`](Self::set_weights) or
/// [`reset_to_static`](Self::reset_to_static).
#[derive(Debug)]
pub struct MixingModel {
    matrix:      MixingMatrix,
    effective:   Vec<f64>,
    frequencies: FrequencyMatrix,
}

impl MixingModel {
    /// Validate `weights` (one row per source location) and build the model.
    pub fn new(weights: Vec<Vec<f64>>) -> MixingResult<Self> {
        Ok(Self::from_matrix(MixingMatrix::from_rows(weights)?))
    }

    pub fn from_matrix(matrix: MixingMatrix) -> Self {
        let size = matrix.size();
        let effective = static_cdf(&matrix);
        Self { matrix, effective, frequencies: FrequencyMatrix::new(size) }
    }

    /// Number of locations `L`.
    #[inline]
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    pub fn matrix(&self) -> &MixingMatrix {
        &self.matrix
    }

    // ── Update hooks ──────────────────────────────────────────────────────

    /// Replace the configured weights.  The matrix size must not change.
    ///
    /// Accumulated frequencies are kept.  On error the previous weights stay
    /// in force.
    pub fn set_weights(&mut self, weights: Vec<Vec<f64>>) -> MixingResult<()> {
        let matrix = MixingMatrix::from_rows(weights)?;
        if matrix.size() != self.size() {
            return Err(MixingError::SizeChanged { expected: self.size(), got: matrix.size() });
        }
        self.effective = static_cdf(&matrix);
        self.matrix = matrix;
        debug!(size = self.size(), "mixing weights replaced");
        Ok(())
    }

    /// Scale each target column by how many candidates it currently holds:
    ///
    /// ```text
    /// p(j | i) ∝ weight(i, j) · occupancy(j)
    /// ```
    ///
    /// A source whose re-weighted row sums to zero keeps its static
    /// distribution.  Returns the number of such rows.
    pub fn reweight_by_occupancy(&mut self, occupancy: &[usize]) -> MixingResult<usize> {
        let size = self.size();
        if occupancy.len() != size {
            return Err(MixingError::OccupancyMismatch { expected: size, got: occupancy.len() });
        }
        let mut kept_static = 0;
        for source in 0..size {
            let raw = self.matrix.weights_row(source)?;
            // Scale by the row maximum first so `w · n` stays finite.
            let scale = raw.iter().copied().fold(0.0, f64::max);
            let weighted: Vec<f64> = raw
                .iter()
                .zip(occupancy)
                .map(|(&w, &n)| w / scale * n as f64)
                .collect();
            let row = match cumulative_row(&weighted) {
                Some(cdf) => cdf,
                None => {
                    kept_static += 1;
                    self.matrix.cumulative_row(source)?.to_vec()
                }
            };
            self.effective[source * size..(source + 1) * size].copy_from_slice(&row);
        }
        if kept_static > 0 {
            warn!(kept_static, "occupancy re-weighting left rows without candidates");
        }
        Ok(kept_static)
    }

    /// Drop any occupancy re-weighting and sample from the static matrix.
    pub fn reset_to_static(&mut self) {
        self.effective = static_cdf(&self.matrix);
    }

    // ── Sampling ──────────────────────────────────────────────────────────

    /// Cumulative distribution currently used for `source`.
    pub fn mate_location_distribution(&self, source: usize) -> MixingResult<&[f64]> {
        self.matrix.check(source)?;
        let size = self.size();
        Ok(&self.effective[source * size..(source + 1) * size])
    }

    /// First target location whose cumulative probability is `>= draw`.
    ///
    /// Deterministic in `draw`; targets with zero probability are never
    /// returned.
    pub fn sample_target_location(&self, source: usize, draw: f64) -> MixingResult<usize> {
        check_draw(draw)?;
        Ok(sample_cdf(self.mate_location_distribution(source)?, draw))
    }

    // ── Frequencies ───────────────────────────────────────────────────────

    /// Count one match between an agent at `source` and a partner at `target`.
    pub fn record_observed_pair(&self, source: usize, target: usize) -> MixingResult<()> {
        self.frequencies.record(source, target)
    }

    pub fn frequencies(&self) -> &FrequencyMatrix {
        &self.frequencies
    }

    /// Convert the accumulated counts to row proportions and reset them.
    pub fn normalize_frequencies(&self) -> FrequencyTable {
        let total = self.frequencies.total();
        let table = self.frequencies.normalize();
        info!(matches = total, "mate location frequencies normalised");
        table
    }

    /// Plain-text rendering of the current counts.
    pub fn describe_frequencies(&self) -> String {
        self.frequencies.describe()
    }
}

fn static_cdf(matrix: &MixingMatrix) -> Vec<f64> {
    (0..matrix.size())
        .flat_map(|i| {
            matrix
                .cumulative_row(i)
                .map(|row| row.to_vec())
                .unwrap_or_default()
        })
        .collect()
}
