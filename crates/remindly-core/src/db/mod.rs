//! Database layer for remindly.

mod schema;

pub use schema::*;

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
///
/// The on-device key-value facility backing the record store. Values are
/// opaque JSON strings here; decoding and leniency toward corrupt data live
/// one layer up in [`crate::store`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Read the raw JSON value stored under a collection key.
    pub fn read_value(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM collections WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Write the raw JSON value for a collection key, replacing any
    /// previous value.
    pub fn write_value(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO collections (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            [key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_missing_key_reads_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.read_value("healthRecords").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let db = Database::open_in_memory().unwrap();
        db.write_value("medications", r#"[{"name":"Aspirin"}]"#)
            .unwrap();

        let value = db.read_value("medications").unwrap().unwrap();
        assert_eq!(value, r#"[{"name":"Aspirin"}]"#);
    }

    #[test]
    fn test_write_replaces_previous_value() {
        let db = Database::open_in_memory().unwrap();
        db.write_value("healthStats", "[]").unwrap();
        db.write_value("healthStats", r#"[{"id":"42"}]"#).unwrap();

        let value = db.read_value("healthStats").unwrap().unwrap();
        assert_eq!(value, r#"[{"id":"42"}]"#);
    }

    #[test]
    fn test_on_disk_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remindly.db");

        {
            let db = Database::open(&path).unwrap();
            db.write_value("medicalHistory", r#"[{"id":"1"}]"#).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let value = db.read_value("medicalHistory").unwrap().unwrap();
        assert_eq!(value, r#"[{"id":"1"}]"#);
    }
}
