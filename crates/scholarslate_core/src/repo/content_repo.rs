//! Content store contract and implementations.
//!
//! # Responsibility
//! - Map an item id to its current full text body.
//!
//! # Invariants
//! - `set` overwrites unconditionally (last write wins).
//! - There is no delete operation.
//! - Keys are not required to exist in the catalog.

use crate::model::item::ItemId;
use crate::repo::{ensure_tables, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// Key-value store of full item bodies.
pub trait ContentStore {
    /// Returns the stored body, or `None` when nothing was saved yet.
    fn get(&self, id: &ItemId) -> RepoResult<Option<String>>;
    /// Replaces the stored body.
    fn set(&mut self, id: &ItemId, body: &str) -> RepoResult<()>;
}

/// Process-local content store.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    bodies: HashMap<ItemId, String>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for InMemoryContentStore {
    fn get(&self, id: &ItemId) -> RepoResult<Option<String>> {
        Ok(self.bodies.get(id).cloned())
    }

    fn set(&mut self, id: &ItemId, body: &str) -> RepoResult<()> {
        self.bodies.insert(id.clone(), body.to_string());
        Ok(())
    }
}

/// SQLite-backed content store over `item_contents`.
pub struct SqliteContentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContentStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["item_contents"])?;
        Ok(Self { conn })
    }
}

impl ContentStore for SqliteContentStore<'_> {
    fn get(&self, id: &ItemId) -> RepoResult<Option<String>> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM item_contents WHERE item_id = ?1;",
                [id.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(body)
    }

    fn set(&mut self, id: &ItemId, body: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO item_contents (item_id, body)
             VALUES (?1, ?2)
             ON CONFLICT (item_id) DO UPDATE SET
                body = excluded.body,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![id.as_str(), body],
        )?;
        Ok(())
    }
}
