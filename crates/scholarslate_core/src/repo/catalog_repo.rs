//! Item catalog contract and implementations.
//!
//! # Responsibility
//! - Hold note/document metadata, including manual highlight phrases.
//! - Assign sequence-based item ids on append.
//!
//! # Invariants
//! - `list` returns records in insertion order.
//! - `update` with highlights replaces the whole phrase list atomically.
//! - `update` on an unknown id returns `NotFound` and changes nothing.

use crate::model::item::{next_item_id, ItemId, ItemKind, ItemMetadata, MetadataPatch, NewItem};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Metadata catalog for notes and documents.
pub trait ItemCatalog {
    fn get(&self, id: &ItemId) -> RepoResult<Option<ItemMetadata>>;
    /// Lists every record in insertion order.
    fn list(&self) -> RepoResult<Vec<ItemMetadata>>;
    /// Applies a partial update in place.
    fn update(&mut self, id: &ItemId, patch: &MetadataPatch) -> RepoResult<()>;
    /// Appends a record and returns its newly assigned id.
    fn append(&mut self, item: NewItem) -> RepoResult<ItemId>;
}

/// Process-local catalog.
#[derive(Debug, Default)]
pub struct InMemoryItemCatalog {
    items: Vec<ItemMetadata>,
}

impl InMemoryItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemCatalog for InMemoryItemCatalog {
    fn get(&self, id: &ItemId) -> RepoResult<Option<ItemMetadata>> {
        Ok(self.items.iter().find(|item| &item.id == id).cloned())
    }

    fn list(&self) -> RepoResult<Vec<ItemMetadata>> {
        Ok(self.items.clone())
    }

    fn update(&mut self, id: &ItemId, patch: &MetadataPatch) -> RepoResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;
        patch.apply_to(item);
        Ok(())
    }

    fn append(&mut self, item: NewItem) -> RepoResult<ItemId> {
        let count_of_kind = self
            .items
            .iter()
            .filter(|existing| existing.kind == item.kind)
            .count();
        let id = next_item_id(item.kind, count_of_kind, |candidate| {
            self.items.iter().any(|existing| &existing.id == candidate)
        });
        self.items.push(item.into_metadata(id.clone()));
        Ok(id)
    }
}

/// SQLite-backed catalog over `items` + `item_highlights`.
pub struct SqliteItemCatalog<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemCatalog<'conn> {
    /// Constructs a catalog from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["items", "item_highlights"])?;
        Ok(Self { conn })
    }
}

impl ItemCatalog for SqliteItemCatalog<'_> {
    fn get(&self, id: &ItemId) -> RepoResult<Option<ItemMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, title, subject, last_modified, excerpt
             FROM items
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list(&self) -> RepoResult<Vec<ItemMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, title, subject, last_modified, excerpt
             FROM items
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(self.conn, row)?);
        }
        Ok(items)
    }

    fn update(&mut self, id: &ItemId, patch: &MetadataPatch) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        if !item_exists(&tx, id)? {
            return Err(RepoError::NotFound(id.clone()));
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(title) = &patch.title {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(subject) = &patch.subject {
            assignments.push("subject = ?");
            bind_values.push(Value::Text(subject.clone()));
        }
        if let Some(date) = patch.last_modified {
            assignments.push("last_modified = ?");
            bind_values.push(Value::Text(date.format(DATE_FORMAT).to_string()));
        }
        if let Some(excerpt) = &patch.excerpt {
            assignments.push("excerpt = ?");
            bind_values.push(Value::Text(excerpt.clone()));
        }
        if !assignments.is_empty() {
            let sql = format!("UPDATE items SET {} WHERE id = ?;", assignments.join(", "));
            bind_values.push(Value::Text(id.as_str().to_string()));
            tx.execute(&sql, params_from_iter(bind_values))?;
        }

        if let Some(highlights) = &patch.highlights {
            replace_highlights(&tx, id, highlights)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn append(&mut self, item: NewItem) -> RepoResult<ItemId> {
        let tx = self.conn.unchecked_transaction()?;
        let taken = load_item_ids(&tx)?;
        let count_of_kind: i64 = tx.query_row(
            "SELECT COUNT(*) FROM items WHERE kind = ?1;",
            [item.kind.as_str()],
            |row| row.get(0),
        )?;
        let count_of_kind = usize::try_from(count_of_kind).map_err(|_| {
            RepoError::InvalidData(format!("negative item count `{count_of_kind}`"))
        })?;
        let id = next_item_id(item.kind, count_of_kind, |candidate| {
            taken.contains(candidate)
        });

        tx.execute(
            "INSERT INTO items (id, kind, title, subject, last_modified, excerpt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.as_str(),
                item.kind.as_str(),
                item.title.as_str(),
                item.subject.as_str(),
                item.last_modified.format(DATE_FORMAT).to_string(),
                item.excerpt.as_str(),
            ],
        )?;
        replace_highlights(&tx, &id, &item.highlights)?;
        tx.commit()?;
        Ok(id)
    }
}

fn parse_item_row(conn: &Connection, row: &Row<'_>) -> RepoResult<ItemMetadata> {
    let id = ItemId::new(row.get::<_, String>("id")?);

    let kind_text: String = row.get("kind")?;
    let kind = ItemKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid item kind `{kind_text}` in items.kind"))
    })?;

    let date_text: String = row.get("last_modified")?;
    let last_modified = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in items.last_modified"
        ))
    })?;

    let highlights = load_highlights(conn, &id)?;
    Ok(ItemMetadata {
        id,
        kind,
        title: row.get("title")?,
        subject: row.get("subject")?,
        last_modified,
        excerpt: row.get("excerpt")?,
        highlights,
    })
}

fn load_highlights(conn: &Connection, id: &ItemId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT phrase
         FROM item_highlights
         WHERE item_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([id.as_str()])?;
    let mut phrases = Vec::new();
    while let Some(row) = rows.next()? {
        phrases.push(row.get(0)?);
    }
    Ok(phrases)
}

fn replace_highlights(conn: &Connection, id: &ItemId, phrases: &[String]) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM item_highlights WHERE item_id = ?1;",
        [id.as_str()],
    )?;
    for (position, phrase) in phrases.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| RepoError::InvalidData("highlight position overflow".to_string()))?;
        conn.execute(
            "INSERT INTO item_highlights (item_id, position, phrase) VALUES (?1, ?2, ?3);",
            params![id.as_str(), position, phrase.as_str()],
        )?;
    }
    Ok(())
}

fn item_exists(conn: &Connection, id: &ItemId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1);",
        [id.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_item_ids(conn: &Connection) -> RepoResult<HashSet<ItemId>> {
    let mut stmt = conn.prepare("SELECT id FROM items;")?;
    let mut rows = stmt.query([])?;
    let mut ids = HashSet::new();
    while let Some(row) = rows.next()? {
        ids.insert(ItemId::new(row.get::<_, String>(0)?));
    }
    Ok(ids)
}
