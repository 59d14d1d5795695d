//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - Append-only event log of found words and finished rounds
//! - The persisted player handle
//! - A `ProgressReporter` that writes game progress into the log

use crate::game::progress::ProgressReporter;
use crate::stats::RoundRecord;
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Current schema version. Bump this when making schema changes.
const SCHEMA_VERSION: u32 = 1;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "motmele.db";

/// Event kind for a finished round (payload: `RoundRecord`)
pub const EVENT_ROUND_END: &str = "round_end";

/// Event kind for a found word (payload: `WordFound`)
pub const EVENT_WORD_FOUND: &str = "word_found";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A stored event in the append-only log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    /// Type of event (e.g., "word_found", "round_end")
    pub kind: String,
    /// JSON payload containing event data
    pub payload: String,
    /// Unix timestamp (milliseconds) when event was created
    pub created_at: i64,
}

/// Payload of a `word_found` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFound {
    pub player: String,
    pub word: String,
    pub points: u32,
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// The main storage handle.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database inside `dir`.
    pub fn open_in(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = dir.join(DATABASE_FILE);
        tracing::debug!(path = %db_path.display(), "opening database");
        Self::from_connection(Connection::open(&db_path)?)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// The OS-standard data directory:
    /// - Linux: `$XDG_DATA_HOME/motmele/` or `~/.local/share/motmele/`
    /// - macOS: `~/Library/Application Support/motmele/`
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "motmele")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// The saved player handle, if any.
    pub fn handle(&self) -> Result<Option<String>, StorageError> {
        let handle = self
            .conn
            .query_row("SELECT handle FROM meta LIMIT 1", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                _ => Err(e),
            })?;
        Ok(handle)
    }

    pub fn set_handle(&self, handle: &str) -> Result<(), StorageError> {
        self.conn
            .execute("UPDATE meta SET handle = ?1", params![handle])?;
        Ok(())
    }

    /// Append an event to the log.
    pub fn append_event(&self, kind: &str, payload: &str) -> Result<Event, StorageError> {
        let created_at = now_millis();
        self.conn.execute(
            "INSERT INTO events (kind, payload, created_at) VALUES (?1, ?2, ?3)",
            params![kind, payload, created_at],
        )?;

        Ok(Event {
            id: self.conn.last_insert_rowid(),
            kind: kind.to_string(),
            payload: payload.to_string(),
            created_at,
        })
    }

    /// All events of one kind, oldest first.
    pub fn events_of_kind(&self, kind: &str) -> Result<Vec<Event>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, payload, created_at FROM events WHERE kind = ?1 ORDER BY created_at, id",
        )?;

        let rows = stmt.query_map(params![kind], |row| {
            Ok(Event {
                id: row.get(0)?,
                kind: row.get(1)?,
                payload: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    /// Total number of events in the log.
    #[cfg(test)]
    pub fn event_count(&self) -> Result<i64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn record_word_found(&self, found: &WordFound) -> Result<Event, StorageError> {
        self.append_event(EVENT_WORD_FOUND, &serde_json::to_string(found)?)
    }

    pub fn record_round(&self, record: &RoundRecord) -> Result<Event, StorageError> {
        self.append_event(EVENT_ROUND_END, &record.to_json()?)
    }

    /// Every finished round. Payloads that no longer parse are skipped.
    pub fn round_records(&self) -> Result<Vec<RoundRecord>, StorageError> {
        let records = self
            .events_of_kind(EVENT_ROUND_END)?
            .into_iter()
            .filter_map(|event| match RoundRecord::from_json(&event.payload) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(event_id = event.id, error = %e, "skipping unreadable round record");
                    None
                }
            })
            .collect();
        Ok(records)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version and player handle
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL,
                handle TEXT,
                created_at INTEGER NOT NULL
            );

            -- Events table: append-only log
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_kind ON events (kind);
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, handle, created_at) VALUES (?1, NULL, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

/// Writes game progress into the event log. Failures are logged, never
/// surfaced to the round.
pub struct StorageReporter {
    storage: Rc<Storage>,
}

impl StorageReporter {
    pub fn new(storage: Rc<Storage>) -> Self {
        Self { storage }
    }
}

impl ProgressReporter for StorageReporter {
    fn word_found(&mut self, player: &str, word: &str, points: u32) {
        let found = WordFound {
            player: player.to_string(),
            word: word.to_string(),
            points,
        };
        if let Err(e) = self.storage.record_word_found(&found) {
            tracing::warn!(error = %e, word, "failed to record found word");
        }
    }

    fn round_finished(&mut self, record: &RoundRecord) {
        match self.storage.record_round(record) {
            Ok(event) => tracing::info!(
                event_id = event.id,
                kind = %event.kind,
                created_at = event.created_at,
                completed = record.completed,
                "round recorded"
            ),
            Err(e) => tracing::warn!(error = %e, "failed to record round"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlayMode;
    use crate::stats::PAYLOAD_VERSION;

    fn sample_record(played_at: i64) -> RoundRecord {
        RoundRecord {
            version: PAYLOAD_VERSION,
            played_at,
            mode: PlayMode::Solo,
            theme: "lieux".to_string(),
            width: 10,
            height: 12,
            words_total: 2,
            scores: vec![("Ana".to_string(), 9)],
            found: vec![
                ("Ana".to_string(), "SION".to_string()),
                ("Ana".to_string(), "ÉDEN".to_string()),
            ],
            completed: true,
            elapsed_secs: 42,
        }
    }

    #[test]
    fn test_storage_creation() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.event_count().unwrap(), 0);
        assert_eq!(storage.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_handle_storage() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.handle().unwrap(), None);

        storage.set_handle("Myriam").unwrap();
        assert_eq!(storage.handle().unwrap(), Some("Myriam".to_string()));
    }

    #[test]
    fn test_append_event() {
        let storage = Storage::open_in_memory().unwrap();
        let first = storage.append_event("test", r#"{"a":1}"#).unwrap();
        let second = storage.append_event("test", r#"{"a":2}"#).unwrap();
        assert!(second.id > first.id);
        assert_eq!(storage.event_count().unwrap(), 2);

        let events = storage.events_of_kind("test").unwrap();
        assert_eq!(events, vec![first, second]);
        assert!(storage.events_of_kind("other").unwrap().is_empty());
    }

    #[test]
    fn test_round_records_roundtrip() {
        let storage = Storage::open_in_memory().unwrap();
        storage.record_round(&sample_record(1)).unwrap();
        storage.record_round(&sample_record(2)).unwrap();

        let records = storage.round_records().unwrap();
        assert_eq!(records, vec![sample_record(1), sample_record(2)]);
    }

    #[test]
    fn test_unreadable_round_record_skipped() {
        let storage = Storage::open_in_memory().unwrap();
        storage.append_event(EVENT_ROUND_END, "not json").unwrap();
        storage.record_round(&sample_record(3)).unwrap();
        assert_eq!(storage.round_records().unwrap().len(), 1);
    }

    #[test]
    fn test_storage_reporter_writes_events() {
        let storage = Rc::new(Storage::open_in_memory().unwrap());
        let mut reporter = StorageReporter::new(Rc::clone(&storage));

        reporter.word_found("Ana", "SION", 4);
        reporter.round_finished(&sample_record(5));

        let found = storage.events_of_kind(EVENT_WORD_FOUND).unwrap();
        assert_eq!(found.len(), 1);
        let payload: WordFound = serde_json::from_str(&found[0].payload).unwrap();
        assert_eq!(payload.word, "SION");
        assert_eq!(storage.round_records().unwrap().len(), 1);
    }

    #[test]
    fn test_open_in_directory_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = Storage::open_in(dir.path()).unwrap();
            storage.set_handle("Ana").unwrap();
            storage.record_round(&sample_record(1)).unwrap();
        }
        let reopened = Storage::open_in(dir.path()).unwrap();
        assert_eq!(reopened.handle().unwrap(), Some("Ana".to_string()));
        assert_eq!(reopened.round_records().unwrap().len(), 1);
        assert!(dir.path().join(DATABASE_FILE).exists());
    }

    #[test]
    fn test_future_schema_rejected() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = Storage::open_in(dir.path()).unwrap();
            storage
                .conn
                .execute("UPDATE meta SET schema_version = 99", [])
                .unwrap();
        }
        assert!(matches!(
            Storage::open_in(dir.path()),
            Err(StorageError::FutureSchemaVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_data_dir() {
        // Should succeed on any normal system with a home directory
        if let Ok(dir) = Storage::data_dir() {
            assert!(dir.to_string_lossy().contains("motmele"));
        }
    }
}
