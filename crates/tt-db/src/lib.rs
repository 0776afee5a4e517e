//! Storage layer for the time tracker.
//!
//! Provides persistence for ticks using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! This means a `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization (e.g. a `Mutex<Database>`).
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Tick times are stored as INTEGER Unix seconds, indexed so range scans stay
//! cheap. Sub-second precision is dropped on insert.
//!
//! ## Label Storage
//!
//! The `labels` column holds the label in its quoted, escaped form (see
//! [`tt_core::label`]), e.g. `"fix \"parser\""`.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tt_core::label::{LabelError, quote_label, unquote_label};
use tt_core::{Tick, TickSource};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored time cannot be represented as a timestamp.
    #[error("tick {id} has out-of-range time {seconds}")]
    TimestampOutOfRange { id: i64, seconds: i64 },
    /// A stored label could not be decoded.
    #[error("tick {id} has an invalid label")]
    InvalidLabel {
        id: i64,
        #[source]
        source: LabelError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- time: Unix seconds
            -- labels: quoted, escaped label
            CREATE TABLE IF NOT EXISTS ticks (
                id INTEGER PRIMARY KEY,
                time INTEGER NOT NULL,
                labels TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_ticks_time ON ticks(time);
            ",
        )?;
        Ok(())
    }

    /// Records a tick.
    pub fn insert_tick(&self, tick: &Tick) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO ticks (time, labels) VALUES (?, ?)",
            params![tick.at.timestamp(), quote_label(&tick.label)],
        )?;
        tracing::debug!(at = %tick.at, label = %tick.label, "tick recorded");
        Ok(())
    }

    /// Lists ticks in `[start, end]`, ordered by time then insertion order.
    ///
    /// When `label` is given only ticks with exactly that label are returned.
    pub fn ticks_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: Option<&str>,
    ) -> Result<Vec<Tick>, DbError> {
        if end < start {
            return Ok(Vec::new());
        }
        let start = start.timestamp();
        let end = end.timestamp();

        let mut rows = Vec::new();
        if let Some(label) = label {
            let mut stmt = self.conn.prepare(
                "
                SELECT id, time, labels
                FROM ticks
                WHERE time BETWEEN ? AND ? AND labels = ?
                ORDER BY time ASC, id ASC
                ",
            )?;
            let mapped = stmt.query_map(params![start, end, quote_label(label)], raw_tick)?;
            for row in mapped {
                rows.push(row?);
            }
        } else {
            let mut stmt = self.conn.prepare(
                "
                SELECT id, time, labels
                FROM ticks
                WHERE time BETWEEN ? AND ?
                ORDER BY time ASC, id ASC
                ",
            )?;
            let mapped = stmt.query_map(params![start, end], raw_tick)?;
            for row in mapped {
                rows.push(row?);
            }
        }

        rows.into_iter().map(RawTick::decode).collect()
    }

    /// Counts all recorded ticks.
    pub fn tick_count(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM ticks", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Returns the most recent tick, if any.
    pub fn last_tick(&self) -> Result<Option<Tick>, DbError> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, time, labels FROM ticks ORDER BY time DESC, id DESC LIMIT 1",
                [],
                raw_tick,
            )
            .optional()?;
        raw.map(RawTick::decode).transpose()
    }

    /// Deletes every tick. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, DbError> {
        let removed = self.conn.execute("DELETE FROM ticks", [])?;
        tracing::debug!(removed, "cleared ticks");
        Ok(removed)
    }
}

impl TickSource for Database {
    type Error = DbError;

    fn ticks_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: Option<&str>,
    ) -> Result<Vec<Tick>, Self::Error> {
        Self::ticks_in_range(self, start, end, label)
    }
}

/// A tick row as stored.
struct RawTick {
    id: i64,
    seconds: i64,
    labels: String,
}

impl RawTick {
    fn decode(self) -> Result<Tick, DbError> {
        let at = DateTime::from_timestamp(self.seconds, 0).ok_or(DbError::TimestampOutOfRange {
            id: self.id,
            seconds: self.seconds,
        })?;
        let label = unquote_label(&self.labels).map_err(|source| DbError::InvalidLabel {
            id: self.id,
            source,
        })?;
        Ok(Tick { at, label })
    }
}

fn raw_tick(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTick> {
    Ok(RawTick {
        id: row.get(0)?,
        seconds: row.get(1)?,
        labels: row.get(2)?,
    })
}
