//! Durable Key-Value Slots.
//!
//! A slot is one named key holding an opaque byte blob.  The memory store
//! writes its whole collection into a single slot and never looks at any
//! other key.
//!
//! # Storage layout
//!
//! [`SqliteSlotStore`] creates a single table `kv_slots` (if it does not
//! already exist) with the following columns:
//!
//! | column     | type | description                          |
//! |------------|------|--------------------------------------|
//! | key        | TEXT | Slot name, primary key               |
//! | value      | BLOB | Opaque payload                       |
//! | updated_at | TEXT | RFC-3339 time of the last write (UTC)|
//!
//! # Example
//!
//! ```rust
//! use hearth_memory::slot::{SlotStore, SqliteSlotStore};
//!
//! let mut slots = SqliteSlotStore::open_in_memory().unwrap();
//! assert!(slots.read("greeting").unwrap().is_none());
//!
//! slots.write("greeting", b"hello").unwrap();
//! assert_eq!(slots.read("greeting").unwrap().as_deref(), Some(&b"hello"[..]));
//!
//! slots.erase("greeting").unwrap();
//! assert!(slots.read("greeting").unwrap().is_none());
//! ```

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tracing::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can arise from slot reads and writes.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Slot backend unavailable: {0}")]
    Unavailable(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// SlotStore
// ─────────────────────────────────────────────────────────────────────────────

/// A process-local durable key-value store.
pub trait SlotStore {
    /// Return the blob stored under `key`, or `None` when the slot is absent.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SlotError>;

    /// Store `value` under `key`, replacing any previous blob.
    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), SlotError>;

    /// Remove `key` entirely.  Erasing an absent slot is not an error.
    fn erase(&mut self, key: &str) -> Result<(), SlotError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// SqliteSlotStore
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite-backed [`SlotStore`].
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Open (or create) a persistent SQLite database at `path`.
    pub fn open(path: &str) -> Result<Self, SlotError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a temporary in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self, SlotError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), SlotError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_slots (
                key        TEXT NOT NULL PRIMARY KEY,
                value      BLOB NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl SlotStore for SqliteSlotStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SlotError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        debug!(key, present = value.is_some(), "read slot");
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), SlotError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key, bytes = value.len(), "wrote slot");
        Ok(())
    }

    fn erase(&mut self, key: &str) -> Result<(), SlotError> {
        let removed = self
            .conn
            .execute("DELETE FROM kv_slots WHERE key = ?1", params![key])?;
        debug!(key, removed, "erased slot");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
