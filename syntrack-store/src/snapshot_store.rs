//! SQLite-backed snapshot store.
//!
//! Append-only: rows are inserted and read, never updated or deleted.
//! Timestamps are stored as unix milliseconds, and `leftover` is a virtual
//! column computed by SQLite so it can never disagree with the other two.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use syntrack_core::{QuotaSample, Snapshot, SnapshotId, SnapshotSource};
use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::persistence::{PRIVATE_FILE_MODE, create_private_parent, restrict};

/// Schema version written to `PRAGMA user_version`.
const SCHEMA_VERSION: i32 = 1;

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS usage_snapshots (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    collected_at       INTEGER NOT NULL,
    subscription_limit INTEGER NOT NULL,
    requests_used      INTEGER NOT NULL,
    leftover           INTEGER GENERATED ALWAYS AS (subscription_limit - requests_used) VIRTUAL,
    renews_at          INTEGER
);
CREATE INDEX IF NOT EXISTS idx_usage_snapshots_collected_at
    ON usage_snapshots (collected_at);
";

const SELECT_COLUMNS: &str =
    "SELECT id, collected_at, subscription_limit, requests_used, renews_at FROM usage_snapshots";

/// Snapshot database.
pub struct SnapshotStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SnapshotStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    ///
    /// A missing parent directory is created owner-only, and the database
    /// file is restricted to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created, or
    /// the schema cannot be applied.
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        create_private_parent(path)?;

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self::init(conn, Some(path.to_path_buf()))?;
        restrict(path, PRIVATE_FILE_MODE)?;

        info!(path = %path.display(), "Opened snapshot database");
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrate(&conn)?;
        Ok(Self { conn, path })
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    /// Database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records a reading taken now.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert(
        &self,
        subscription_limit: i64,
        requests_used: i64,
        renews_at: Option<DateTime<Utc>>,
    ) -> Result<Snapshot, StoreError> {
        let sample = QuotaSample {
            subscription_limit,
            requests_used,
            renews_at,
            observed_at: None,
        };
        self.insert_sample(&sample)
    }

    /// Records a collector sample, stamped with its observation time or now.
    ///
    /// Values are stored as given; nothing is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_sample(&self, sample: &QuotaSample) -> Result<Snapshot, StoreError> {
        let collected_at = truncate_to_millis(sample.observed_at.unwrap_or_else(Utc::now));
        let renews_at = sample.renews_at.map(truncate_to_millis);

        self.conn
            .prepare_cached(
                "INSERT INTO usage_snapshots \
                 (collected_at, subscription_limit, requests_used, renews_at) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?
            .execute(params![
                collected_at.timestamp_millis(),
                sample.subscription_limit,
                sample.requests_used,
                renews_at.map(|t| t.timestamp_millis()),
            ])?;
        let id = SnapshotId(self.conn.last_insert_rowid());

        debug!(
            id = id.0,
            limit = sample.subscription_limit,
            used = sample.requests_used,
            "Inserted snapshot"
        );

        Ok(Snapshot {
            id,
            collected_at,
            subscription_limit: sample.subscription_limit,
            requests_used: sample.requests_used,
            renews_at,
        })
    }

    /// Most recent snapshot by collection time; ties go to the later insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn latest(&self) -> Result<Option<Snapshot>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY collected_at DESC, id DESC LIMIT 1");
        self.conn
            .prepare_cached(&sql)?
            .query_row([], read_row)
            .optional()?
            .transpose()
    }

    /// Snapshots with `collected_at >= since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn range(&self, since: DateTime<Utc>) -> Result<Vec<Snapshot>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE collected_at >= ?1 ORDER BY collected_at, id");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![since.timestamp_millis()], read_row)?;

        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row??);
        }
        Ok(snapshots)
    }

    /// Every stored snapshot, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn all(&self) -> Result<Vec<Snapshot>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY collected_at, id");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], read_row)?;

        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row??);
        }
        Ok(snapshots)
    }

    /// Number of stored snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM usage_snapshots", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl SnapshotSource for SnapshotStore {
    type Error = StoreError;

    fn latest(&self) -> Result<Option<Snapshot>, StoreError> {
        SnapshotStore::latest(self)
    }

    fn range(&self, since: DateTime<Utc>) -> Result<Vec<Snapshot>, StoreError> {
        SnapshotStore::range(self, since)
    }

    fn all(&self) -> Result<Vec<Snapshot>, StoreError> {
        SnapshotStore::all(self)
    }
}

// ============================================================================
// Schema
// ============================================================================

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version > SCHEMA_VERSION {
        return Err(StoreError::Config(format!(
            "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }
    if version < SCHEMA_VERSION {
        debug!(from = version, to = SCHEMA_VERSION, "Migrating snapshot schema");
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

// ============================================================================
// Row Decoding
// ============================================================================

/// Decodes one row. SQLite errors surface through the outer `Result`;
/// undecodable timestamps through the inner one.
fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<Snapshot, StoreError>> {
    let id: i64 = row.get(0)?;
    let collected_ms: i64 = row.get(1)?;
    let subscription_limit: i64 = row.get(2)?;
    let requests_used: i64 = row.get(3)?;
    let renews_ms: Option<i64> = row.get(4)?;

    let Some(collected_at) = DateTime::from_timestamp_millis(collected_ms) else {
        return Ok(Err(StoreError::CorruptRow(format!(
            "snapshot {id}: collected_at {collected_ms} out of range"
        ))));
    };
    let renews_at = match renews_ms {
        None => None,
        Some(ms) => match DateTime::from_timestamp_millis(ms) {
            Some(t) => Some(t),
            None => {
                return Ok(Err(StoreError::CorruptRow(format!(
                    "snapshot {id}: renews_at {ms} out of range"
                ))));
            }
        },
    };

    Ok(Ok(Snapshot {
        id: SnapshotId(id),
        collected_at,
        subscription_limit,
        requests_used,
        renews_at,
    }))
}

/// Drops sub-millisecond precision so a returned snapshot equals its
/// re-read.
fn truncate_to_millis(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(t.timestamp_millis()).unwrap_or(t)
}
