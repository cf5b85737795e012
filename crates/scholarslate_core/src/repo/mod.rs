//! Repository layer: content store and item catalog.
//!
//! # Responsibility
//! - Define the store contracts that services receive by injection.
//! - Provide in-memory and SQLite implementations of each contract.
//!
//! # Invariants
//! - Stores are last-write-wins; there is no versioning or history.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage transport errors.

use crate::db::DbError;
use crate::model::item::ItemId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog_repo;
pub mod content_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by catalog and content stores.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn table_exists(conn: &rusqlite::Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Rejects connections whose schema lacks any of `tables`.
pub(crate) fn ensure_tables(conn: &rusqlite::Connection, tables: &[&str]) -> RepoResult<()> {
    for table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::InvalidData(format!(
                "required table `{table}` is missing; open the database with `open_db`"
            )));
        }
    }
    Ok(())
}
