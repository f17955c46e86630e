//! `MixingMatrix` — validated location × location weights.

use crate::{MixingError, MixingResult};

/// Square matrix of non-negative mixing weights, kept alongside its
/// row-cumulative form.
///
/// Both are stored row-major in flat `Vec`s: entry `(i, j)` lives at
/// `i * size + j`.
#[derive(Clone, Debug)]
pub struct MixingMatrix {
    size:       usize,
    weights:    Vec<f64>,
    cumulative: Vec<f64>,
}

impl MixingMatrix {
    /// Validate `rows` and normalise every row into a cumulative distribution.
    ///
    /// Fails if the matrix is empty or not square, if any weight is negative
    /// or non-finite, or if any row sums to zero or overflows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> MixingResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(MixingError::Empty);
        }

        let mut weights = Vec::with_capacity(size * size);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != size {
                return Err(MixingError::NotSquare { row, len: r.len(), expected: size });
            }
            for (col, &value) in r.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(MixingError::InvalidWeight { row, col, value });
                }
            }
            weights.extend_from_slice(r);
        }

        let mut cumulative = Vec::with_capacity(size * size);
        for row in 0..size {
            let r = &weights[row * size..(row + 1) * size];
            if !r.iter().sum::<f64>().is_finite() {
                return Err(MixingError::RowOverflow { row });
            }
            let cdf = cumulative_row(r)
                .ok_or(MixingError::ZeroRow { row })?;
            cumulative.extend(cdf);
        }

        Ok(Self { size, weights, cumulative })
    }

    /// Number of locations `L`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw configured weights for `source`.
    pub fn weights_row(&self, source: usize) -> MixingResult<&[f64]> {
        self.check(source)?;
        Ok(&self.weights[source * self.size..(source + 1) * self.size])
    }

    /// Cumulative distribution for `source`; last entry is exactly 1.0.
    pub fn cumulative_row(&self, source: usize) -> MixingResult<&[f64]> {
        self.check(source)?;
        Ok(&self.cumulative[source * self.size..(source + 1) * self.size])
    }

    /// `P(target | source)` recovered from the cumulative row.
    pub fn probability(&self, source: usize, target: usize) -> MixingResult<f64> {
        let cdf = self.cumulative_row(source)?;
        self.check(target)?;
        let prev = if target == 0 { 0.0 } else { cdf[target - 1] };
        Ok(cdf[target] - prev)
    }

    /// Inverse-CDF sample for `source` given a uniform `draw` in `[0, 1]`.
    pub fn sample(&self, source: usize, draw: f64) -> MixingResult<usize> {
        check_draw(draw)?;
        Ok(sample_cdf(self.cumulative_row(source)?, draw))
    }

    pub(crate) fn check(&self, location: usize) -> MixingResult<()> {
        if location < self.size {
            Ok(())
        } else {
            Err(MixingError::LocationOutOfRange { location, size: self.size })
        }
    }
}

// ── Helpers shared with MixingModel ──────────────────────────────────────────

/// Normalise `weights` into a cumulative distribution.
///
/// Returns `None` if the row sums to zero.  Every entry from the last
/// non-zero weight onward is pinned to exactly 1.0 so that a draw of 1.0
/// always resolves to a target with positive weight.
pub(crate) fn cumulative_row(weights: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let last = weights.iter().rposition(|&w| w > 0.0)?;
    let mut running = 0.0;
    let cdf = weights
        .iter()
        .enumerate()
        .map(|(j, &w)| {
            if j >= last {
                1.0
            } else {
                running += w;
                running / total
            }
        })
        .collect();
    Some(cdf)
}

/// First target whose cumulative probability is `>= draw`, skipping targets
/// with zero probability.
pub(crate) fn sample_cdf(cdf: &[f64], draw: f64) -> usize {
    let mut prev = 0.0;
    for (j, &c) in cdf.iter().enumerate() {
        if c > prev && c >= draw {
            return j;
        }
        prev = c;
    }
    // Unreachable for a valid cdf (last positive entry is 1.0).
    cdf.len() - 1
}

pub(crate) fn check_draw(draw: f64) -> MixingResult<()> {
    if (0.0..=1.0).contains(&draw) {
        Ok(())
    } else {
        Err(MixingError::InvalidDraw(draw))
    }
}
