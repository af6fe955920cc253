//! SQLite-based local storage.
//!
//! Provides persistent storage for:
//! - Completed timer intervals (a local log independent of the backend)
//! - Interval statistics (daily and all-time)
//! - Key-value store for application state, such as the saved timer cycle

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::timer::{TimerCycle, TimerMode};

const TIMER_KEY: &str = "timer_cycle";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub mode: TimerMode,
    pub duration_min: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_intervals: u64,
    pub work_sessions: u64,
    pub total_work_min: u64,
    pub total_break_min: u64,
    pub today_work_sessions: u64,
    pub today_work_min: u64,
}

/// SQLite database for local state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/questkeep.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("questkeep.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                mode         TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                started_at   TEXT NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_mode ON sessions(mode);",
        )?;
        Ok(())
    }

    /// Record a completed interval.
    pub fn record_session(
        &self,
        mode: TimerMode,
        duration_min: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (mode, duration_min, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                mode.as_str(),
                duration_min,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent intervals first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mode, duration_min, started_at, completed_at
             FROM sessions
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, mode, duration_min, started_at, completed_at) = row?;
            sessions.push(SessionRecord {
                id,
                mode: mode.parse().map_err(DatabaseError::QueryFailed)?,
                duration_min,
                started_at: parse_ts(&started_at)?,
                completed_at: parse_ts(&completed_at)?,
            });
        }
        Ok(sessions)
    }

    pub fn stats_today(&self) -> Result<Stats, DatabaseError> {
        self.stats_since(Some(start_of_today()))
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        self.stats_since(None)
    }

    fn stats_since(&self, since: Option<String>) -> Result<Stats, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT mode, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             WHERE ?1 IS NULL OR completed_at >= ?1
             GROUP BY mode",
        )?;
        let rows = stmt.query_map(params![since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut stats = Stats::default();
        for row in rows {
            let (mode, count, minutes) = row?;
            stats.total_intervals += count;
            if mode == TimerMode::Work.as_str() {
                stats.work_sessions += count;
                stats.total_work_min += minutes;
            } else {
                stats.total_break_min += minutes;
            }
        }

        let (today_sessions, today_min) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             WHERE mode = ?1 AND completed_at >= ?2",
            params![TimerMode::Work.as_str(), start_of_today()],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        stats.today_work_sessions = today_sessions;
        stats.today_work_min = today_min;

        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Saved timer cycle, if any. A record that no longer parses is ignored.
    pub fn load_timer(&self) -> Result<Option<TimerCycle>, DatabaseError> {
        let Some(json) = self.kv_get(TIMER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(cycle) => Ok(Some(cycle)),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable saved timer");
                Ok(None)
            }
        }
    }

    pub fn save_timer(&self, cycle: &TimerCycle) -> Result<(), CoreError> {
        let json = serde_json::to_string(cycle)?;
        self.kv_set(TIMER_KEY, &json)?;
        Ok(())
    }
}

fn start_of_today() -> String {
    format!("{}T00:00:00+00:00", Utc::now().format("%Y-%m-%d"))
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{raw}': {e}")))
}
