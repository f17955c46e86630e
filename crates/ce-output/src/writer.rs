//! The `DiagnosticsWriter` trait implemented by all backend writers.

use crate::{FrequencyRow, OutputResult, PopulationRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait DiagnosticsWriter {
    /// Write a batch of category occupancy rows.
    fn write_population(&mut self, rows: &[PopulationRow]) -> OutputResult<()>;

    /// Write a batch of mate-location frequency rows.
    fn write_frequencies(&mut self, rows: &[FrequencyRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
