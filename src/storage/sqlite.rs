//! SQLite snapshot store
//!
//! A single `snapshots` table keyed by snapshot key. Thread-safe via an
//! internal mutex on the connection.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::traits::{OpenStore, SnapshotStore, StorageResult};

/// SQLite-backed snapshot store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                blob TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(dir) = path.as_ref().parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        let blob = conn
            .query_row(
                "SELECT blob FROM snapshots WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn save(&self, key: &str, blob: &str) -> StorageResult<()> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        conn.execute(
            r#"
            INSERT INTO snapshots (key, blob, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                blob = excluded.blob,
                updated_at = excluded.updated_at
            "#,
            params![key, blob],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().expect("connection lock poisoned");
        let removed = conn.execute("DELETE FROM snapshots WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }
}
