#![forbid(unsafe_code)]
//! SQLite persistence for experiment records.
//!
//! One table, two shapes: inserts take a validated [`NewExperiment`], reads
//! return either the full [`Experiment`] or the list projection
//! [`ExperimentSummary`]. The store assigns identifiers and creation
//! timestamps; rows are never updated or deleted.

use nullresults_model::{Experiment, ExperimentSummary, NewExperiment};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

pub const CRATE_NAME: &str = "nullresults-store";

/// Fixed size of the most-recent window served by the list operation.
pub const LIST_WINDOW: usize = 20;

/// AUTOINCREMENT keeps rowids monotonic so identifiers are never reused,
/// even after out-of-band deletes.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS experiments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    summary TEXT NOT NULL,
    what_tried TEXT NOT NULL,
    what_went_wrong TEXT NOT NULL,
    what_learned TEXT NOT NULL,
    tags TEXT,
    author_name TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self(e.to_string())
    }
}

/// Handle over the experiments table. Construct one and pass it where it is
/// needed; nothing in this crate reaches for ambient state.
pub struct ExperimentStore {
    conn: Connection,
}

impl ExperimentStore {
    /// Opens (creating if absent) the database at `path` and ensures the
    /// schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::with_connection(conn)
    }

    /// In-memory store for tests and local experimentation.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Inserts one row and returns the store-assigned identifier. The
    /// caller has already validated required-field presence; `tags` and
    /// `author_name` bind as NULL when absent.
    pub fn insert_experiment(&self, input: &NewExperiment) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO experiments
             (title, summary, what_tried, what_went_wrong, what_learned, tags, author_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                input.title,
                input.summary,
                input.what_tried,
                input.what_went_wrong,
                input.what_learned,
                input.tags,
                input.author_name,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Up to [`LIST_WINDOW`] most recent records, newest first, summary
    /// projection only. Rowid breaks ties within one timestamp second.
    pub fn list_recent(&self) -> Result<Vec<ExperimentSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, summary, tags, author_name, created_at
             FROM experiments
             ORDER BY datetime(created_at) DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![LIST_WINDOW as i64], |row| {
            Ok(ExperimentSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                summary: row.get(2)?,
                tags: row.get(3)?,
                author_name: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Full record for `id`, or `None` when no row matches.
    pub fn fetch_experiment(&self, id: i64) -> Result<Option<Experiment>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, summary, what_tried, what_went_wrong, what_learned,
                    tags, author_name, created_at
             FROM experiments
             WHERE id = ?1
             LIMIT 1",
        )?;
        let row = stmt
            .query_row(params![id], |row| {
                Ok(Experiment {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    summary: row.get(2)?,
                    what_tried: row.get(3)?,
                    what_went_wrong: row.get(4)?,
                    what_learned: row.get(5)?,
                    tags: row.get(6)?,
                    author_name: row.get(7)?,
                    created_at: row.get(8)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    /// Total row count; used by readiness checks and tests.
    pub fn count(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM experiments", [], |row| row.get(0))?)
    }
}
