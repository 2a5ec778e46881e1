//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `choices` and `choice_shares`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::ChoiceWriter;
use crate::{ChoiceRow, OutputError, OutputResult, ShareRow};

/// Writes scheduled choices to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            r#"PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS choices (
                 agent_id INTEGER PRIMARY KEY,
                 segment  TEXT    NOT NULL,
                 tdd      INTEGER NOT NULL,
                 start    REAL    NOT NULL,
                 "end"    REAL    NOT NULL,
                 duration REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS choice_shares (
                 model  TEXT    NOT NULL,
                 alt_id INTEGER NOT NULL,
                 start  REAL    NOT NULL,
                 "end"  REAL    NOT NULL,
                 count  INTEGER NOT NULL,
                 share  REAL    NOT NULL,
                 PRIMARY KEY (model, alt_id)
             );"#,
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl ChoiceWriter for SqliteWriter {
    fn write_choices(&mut self, rows: &[ChoiceRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO choices (agent_id, segment, tdd, start, "end", duration)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            )?;
            for row in rows {
                let agent_id =
                    i64::try_from(row.agent_id).map_err(|_| OutputError::IdRange(row.agent_id))?;
                stmt.execute(rusqlite::params![
                    agent_id,
                    row.segment,
                    row.tdd,
                    row.start,
                    row.end,
                    row.duration,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, rows: &[ShareRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO choice_shares (model, alt_id, start, "end", count, share)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.model,
                    row.alt_id,
                    row.start,
                    row.end,
                    row.count as i64,
                    row.share,
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
