//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `population.csv`
//! - `mate_location_frequencies.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::DiagnosticsWriter;
use crate::{FrequencyRow, OutputResult, PopulationRow};

/// Writes diagnostics to two CSV files.
pub struct CsvWriter {
    population:  Writer<File>,
    frequencies: Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut population = Writer::from_path(dir.join("population.csv"))?;
        population.write_record(["step", "year", "location", "age_bracket", "risk_class", "count"])?;

        let mut frequencies = Writer::from_path(dir.join("mate_location_frequencies.csv"))?;
        frequencies.write_record(["step", "year", "source", "target", "proportion", "matches"])?;

        Ok(Self { population, frequencies, finished: false })
    }
}

impl DiagnosticsWriter for CsvWriter {
    fn write_population(&mut self, rows: &[PopulationRow]) -> OutputResult<()> {
        for row in rows {
            self.population.write_record(&[
                row.step.to_string(),
                row.year.to_string(),
                row.location.to_string(),
                row.age_bracket.to_string(),
                row.risk_class.to_string(),
                row.count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_frequencies(&mut self, rows: &[FrequencyRow]) -> OutputResult<()> {
        for row in rows {
            self.frequencies.write_record(&[
                row.step.to_string(),
                row.year.to_string(),
                row.source.to_string(),
                row.target.to_string(),
                format!("{:.6}", row.proportion),
                row.matches.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.population.flush()?;
        self.frequencies.flush()?;
        Ok(())
    }
}
