//! `DiagnosticsRecorder<W>` — turns index and frequency state into rows for
//! any `DiagnosticsWriter`.

use ce_core::Step;
use ce_index::CategoricalIndex;
use ce_mixing::FrequencyTable;
use tracing::warn;

use crate::row::{FrequencyRow, PopulationRow};
use crate::writer::DiagnosticsWriter;
use crate::{OutputError, OutputResult};

/// Records per-step diagnostics to a [`DiagnosticsWriter`] backend.
///
/// Recording never interrupts the caller's step loop: write errors are
/// stored internally and retrieved with [`take_error`][Self::take_error].
pub struct DiagnosticsRecorder<W: DiagnosticsWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: DiagnosticsWriter> DiagnosticsRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored error (if any).  Returns `None` if all writes
    /// succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            warn!(error = %e, "diagnostics write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    /// Write one row per non-empty category of a built index.
    pub fn record_population(&mut self, index: &CategoricalIndex, step: Step, year: i64) {
        let result = population_rows(index, step, year).and_then(|rows| self.writer.write_population(&rows));
        self.store_err(result);
    }

    /// Write every cell of a normalised frequency table whose source row saw
    /// at least one match.
    pub fn record_frequencies(&mut self, table: &FrequencyTable, step: Step, year: i64) {
        let rows = frequency_rows(table, step, year);
        let result = self.writer.write_frequencies(&rows);
        self.store_err(result);
    }

    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

/// Occupancy rows for `index`.  Fails if the index has not been rebuilt.
pub fn population_rows(index: &CategoricalIndex, step: Step, year: i64) -> OutputResult<Vec<PopulationRow>> {
    if index.epoch().is_none() {
        return Err(ce_index::IndexError::NotBuilt.into());
    }
    Ok(index
        .occupancy()
        .filter(|&(_, n)| n > 0)
        .map(|(key, n)| PopulationRow {
            step:        step.0,
            year,
            location:    key.location as u32,
            age_bracket: key.age_bracket as u32,
            risk_class:  key.risk_class as u32,
            count:       n as u64,
        })
        .collect())
}

/// Frequency rows for `table`, skipping sources with no matches.
pub fn frequency_rows(table: &FrequencyTable, step: Step, year: i64) -> Vec<FrequencyRow> {
    table
        .iter()
        .filter_map(|(source, target, proportion)| {
            let matches = table.row_total(source)?;
            (matches > 0).then_some(FrequencyRow {
                step: step.0,
                year,
                source: source as u32,
                target: target as u32,
                proportion,
                matches,
            })
        })
        .collect()
}
