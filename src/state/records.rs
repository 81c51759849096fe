use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::RecordError;

/// Append-only log of timestamps, kept in SQLite.
///
/// The host appends one record when it starts. Nothing in the app reads
/// the records back; `count` exists for the startup log line.
pub struct RecordStore {
    conn: Connection,
    /// None for in-memory stores
    db_path: Option<PathBuf>,
}

impl RecordStore {
    /// Open (or create) the record database at `path`.
    ///
    /// The parent directory is created if it does not exist.
    pub fn open(path: &Path) -> Result<Self, RecordError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        log::info!("📁 Record database at: {}", path.display());

        let store = RecordStore {
            conn,
            db_path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// A throwaway store that lives only as long as the value
    pub fn open_in_memory() -> Result<Self, RecordError> {
        let store = RecordStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create the records table if it doesn't exist
    fn init_schema(&self) -> Result<(), RecordError> {
        // timestamp is milliseconds since the Unix epoch, UTC
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS records (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Append a record; returns its id
    pub fn append(&self, at: DateTime<Utc>) -> Result<i64, RecordError> {
        self.conn.execute(
            "INSERT INTO records (timestamp) VALUES (?1)",
            rusqlite::params![at.timestamp_millis()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append a record stamped with the current time
    pub fn append_now(&self) -> Result<i64, RecordError> {
        self.append(Utc::now())
    }

    /// Number of records
    pub fn count(&self) -> Result<i64, RecordError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_increments_ids() {
        let store = RecordStore::open_in_memory().unwrap();
        let first = store.append_now().unwrap();
        let second = store.append_now().unwrap();
        assert!(second > first);
        assert_eq!(store.count().unwrap(), 2);
        assert!(store.path().is_none());
    }

    #[test]
    fn test_records_persist_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("records.db");

        {
            let store = RecordStore::open(&path).unwrap();
            store.append(Utc::now()).unwrap();
        }

        let reopened = RecordStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn test_count_reports_missing_table() {
        let store = RecordStore::open_in_memory().unwrap();
        store.conn.execute("DROP TABLE records", []).unwrap();
        assert!(matches!(store.count(), Err(RecordError::Sqlite(_))));
    }
}
