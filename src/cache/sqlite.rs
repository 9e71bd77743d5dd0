//! SQLite cache backend

use crate::cache::traits::{CacheResult, CacheStore, Slot};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS slots (
    key        TEXT PRIMARY KEY,
    payload    TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// SQLite-backed slot store
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Opens (or creates) the cache database at the given path
    pub fn open(path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteCache { conn })
    }

    /// Opens an in-memory cache, used by tests
    pub fn in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteCache { conn })
    }
}

impl CacheStore for SqliteCache {
    fn read_slot(&self, slot: Slot) -> CacheResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM slots WHERE key = ?1",
                [slot.key()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&mut self, slot: Slot, payload: &str) -> CacheResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, payload, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET payload = excluded.payload,
                                            updated_at = excluded.updated_at",
            rusqlite::params![slot.key(), payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> CacheResult<()> {
        self.conn.execute("DELETE FROM slots", [])?;
        Ok(())
    }
}
