//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `ticks` (calendar and readings, one row per record) and
//! `quantities` (long format, one row per record and field).

use std::path::Path;

use rusqlite::Connection;

use crate::writer::{check_width, OutputWriter};
use crate::{OutputResult, ReportRow};

/// Writes tick records to an SQLite database.
pub struct SqliteWriter {
    conn:        Connection,
    field_names: Vec<String>,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS ticks (
                 tick          INTEGER PRIMARY KEY,
                 year          INTEGER NOT NULL,
                 month         INTEGER NOT NULL,
                 temperature   REAL    NOT NULL,
                 precipitation REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS quantities (
                 tick  INTEGER NOT NULL,
                 field TEXT    NOT NULL,
                 value REAL    NOT NULL,
                 PRIMARY KEY (tick, field)
             );",
        )?;

        Ok(Self { conn, field_names: Vec::new() })
    }
}

impl OutputWriter for SqliteWriter {
    fn begin(&mut self, field_names: &[String]) -> OutputResult<()> {
        self.field_names = field_names.to_vec();
        Ok(())
    }

    /// The initial record of a follow-up run repeats the previous run's last
    /// tick, so rows are upserted.
    fn write_record(&mut self, row: &ReportRow) -> OutputResult<()> {
        check_width(self.field_names.len(), row)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO ticks (tick, year, month, temperature, precipitation) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![row.tick, row.year, row.month, row.temperature, row.precipitation],
        )?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO quantities (tick, field, value) VALUES (?1, ?2, ?3)",
            )?;
            for (name, value) in self.field_names.iter().zip(&row.values) {
                stmt.execute(rusqlite::params![row.tick, name, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
