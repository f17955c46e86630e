//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `diagnostics.db` file in the configured output directory
//! with two tables: `population` and `mate_location_frequencies`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::DiagnosticsWriter;
use crate::{FrequencyRow, OutputResult, PopulationRow};

/// Writes diagnostics to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `diagnostics.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("diagnostics.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS population (
                 step        INTEGER NOT NULL,
                 year        INTEGER NOT NULL,
                 location    INTEGER NOT NULL,
                 age_bracket INTEGER NOT NULL,
                 risk_class  INTEGER NOT NULL,
                 count       INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS mate_location_frequencies (
                 step       INTEGER NOT NULL,
                 year       INTEGER NOT NULL,
                 source     INTEGER NOT NULL,
                 target     INTEGER NOT NULL,
                 proportion REAL    NOT NULL,
                 matches    INTEGER NOT NULL,
                 PRIMARY KEY (step, source, target)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl DiagnosticsWriter for SqliteWriter {
    fn write_population(&mut self, rows: &[PopulationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO population \
                 (step, year, location, age_bracket, risk_class, count) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.step as i64,
                    row.year,
                    row.location,
                    row.age_bracket,
                    row.risk_class,
                    row.count as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_frequencies(&mut self, rows: &[FrequencyRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO mate_location_frequencies \
                 (step, year, source, target, proportion, matches) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.step as i64,
                    row.year,
                    row.source,
                    row.target,
                    row.proportion,
                    row.matches as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
