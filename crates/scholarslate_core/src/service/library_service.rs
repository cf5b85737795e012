//! Library use-case service.
//!
//! # Responsibility
//! - Browse subjects and items, create notes, open and save edit sessions.
//! - Keep callers decoupled from catalog/content storage details.
//!
//! # Invariants
//! - Stores are injected; the service never reaches for process globals.
//! - Listings are sorted by `last_modified DESC, id ASC`.
//! - Session state reaches the stores only through `save_session`, which
//!   lands body and highlights together or not at all.
//! - Failed validation never mutates a store.

use crate::model::item::{
    derive_excerpt, ItemId, ItemKind, ItemMetadata, MetadataPatch, NewItem,
};
use crate::model::subject::{default_subjects, find_subject, find_subject_by_name, Subject};
use crate::repo::catalog_repo::ItemCatalog;
use crate::repo::content_repo::ContentStore;
use crate::repo::RepoError;
use crate::service::seed::demo_items;
use crate::service::session::EditSession;
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of recent notes/documents shown on the dashboard.
pub const DASHBOARD_DEFAULT_LIMIT: usize = 3;

/// Form-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more of title/content/subject is blank.
    MissingFields(Vec<&'static str>),
    /// Subject name does not match a known subject.
    UnknownSubject(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            Self::UnknownSubject(name) => write!(f, "unknown subject: `{name}`"),
        }
    }
}

impl Error for ValidationError {}

/// Service error for library use-cases.
#[derive(Debug)]
pub enum LibraryError {
    Validation(ValidationError),
    /// Requested item does not exist.
    ItemNotFound(ItemId),
    /// Requested subject slug does not exist.
    SubjectNotFound(String),
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::SubjectNotFound(id) => write!(f, "subject not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent library state: {details}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LibraryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for LibraryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Input of the "new note" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNoteRequest {
    pub title: String,
    /// Subject display name.
    pub subject: String,
    pub content: String,
}

/// Recent items shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub recent_notes: Vec<ItemMetadata>,
    pub recent_documents: Vec<ItemMetadata>,
}

/// Library facade over an item catalog and a content store.
pub struct LibraryService<C: ItemCatalog, S: ContentStore> {
    catalog: C,
    contents: S,
}

impl<C: ItemCatalog, S: ContentStore> LibraryService<C, S> {
    /// Creates a service over the provided stores.
    pub fn new(catalog: C, contents: S) -> Self {
        Self { catalog, contents }
    }

    pub fn subjects(&self) -> &'static [Subject] {
        default_subjects()
    }

    /// Lists every item, most recently modified first.
    pub fn all_items(&self) -> Result<Vec<ItemMetadata>, LibraryError> {
        let mut items = self.catalog.list()?;
        sort_by_recency(&mut items);
        Ok(items)
    }

    /// Lists the items of one subject, most recently modified first.
    pub fn subject_items(&self, subject_id: &str) -> Result<Vec<ItemMetadata>, LibraryError> {
        let subject = find_subject(subject_id)
            .ok_or_else(|| LibraryError::SubjectNotFound(subject_id.to_string()))?;
        let mut items = self
            .catalog
            .list()?
            .into_iter()
            .filter(|item| item.subject == subject.name)
            .collect::<Vec<_>>();
        sort_by_recency(&mut items);
        Ok(items)
    }

    /// Returns the first `limit` notes and documents in catalog order.
    pub fn dashboard(&self, limit: usize) -> Result<Dashboard, LibraryError> {
        let items = self.catalog.list()?;
        let take_kind = |kind: ItemKind| {
            items
                .iter()
                .filter(|item| item.kind == kind)
                .take(limit)
                .cloned()
                .collect::<Vec<_>>()
        };
        Ok(Dashboard {
            recent_notes: take_kind(ItemKind::Note),
            recent_documents: take_kind(ItemKind::Document),
        })
    }

    /// Creates a note from the "new note" form.
    ///
    /// # Errors
    /// - `Validation(MissingFields)` when title, content or subject is blank.
    /// - `Validation(UnknownSubject)` when the subject name is not known.
    pub fn create_note(
        &mut self,
        request: NewNoteRequest,
        today: NaiveDate,
    ) -> Result<ItemMetadata, LibraryError> {
        let mut missing = Vec::new();
        if request.title.trim().is_empty() {
            missing.push("title");
        }
        if request.content.trim().is_empty() {
            missing.push("content");
        }
        if request.subject.trim().is_empty() {
            missing.push("subject");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing).into());
        }
        let subject = find_subject_by_name(request.subject.trim())
            .ok_or_else(|| ValidationError::UnknownSubject(request.subject.clone()))?;

        let id = self.catalog.append(NewItem {
            kind: ItemKind::Note,
            title: request.title.trim().to_string(),
            subject: subject.name.to_string(),
            last_modified: today,
            excerpt: derive_excerpt(&request.content),
            highlights: Vec::new(),
        })?;
        self.contents.set(&id, &request.content)?;
        info!(
            "event=note_create module=library status=ok item_id={} subject={}",
            id, subject.id
        );

        self.catalog
            .get(&id)?
            .ok_or(LibraryError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Opens an item for editing.
    ///
    /// The body comes from the content store; items that were never saved get
    /// a placeholder body built from their excerpt and title.
    pub fn open_item(&self, id: &ItemId) -> Result<EditSession, LibraryError> {
        let item = self
            .catalog
            .get(id)?
            .ok_or_else(|| LibraryError::ItemNotFound(id.clone()))?;
        let body = match self.contents.get(id)? {
            Some(body) => body,
            None => placeholder_body(&item),
        };
        Ok(EditSession::new(item, body))
    }

    /// Writes the session body and highlights back to the stores.
    ///
    /// Also bumps `last_modified` to `today`. The catalog is patched first;
    /// if the body write then fails, the previous highlights and date are
    /// restored so the two stores never disagree. On success the session is
    /// marked clean and refreshed with the stored metadata.
    ///
    /// # Errors
    /// - `ItemNotFound` when the item vanished from the catalog.
    /// - `Repo` when either store write fails; nothing is left half-saved.
    /// - `InconsistentState` when the body write and the catalog rollback
    ///   both fail.
    pub fn save_session(
        &mut self,
        session: &mut EditSession,
        today: NaiveDate,
    ) -> Result<ItemMetadata, LibraryError> {
        let id = session.id().clone();
        let previous = self
            .catalog
            .get(&id)?
            .ok_or_else(|| LibraryError::ItemNotFound(id.clone()))?;

        let patch = MetadataPatch {
            last_modified: Some(today),
            highlights: Some(session.highlights().phrases()),
            ..MetadataPatch::default()
        };
        self.catalog.update(&id, &patch)?;

        if let Err(write_err) = self.contents.set(&id, session.body()) {
            let rollback = MetadataPatch {
                last_modified: Some(previous.last_modified),
                highlights: Some(previous.highlights),
                ..MetadataPatch::default()
            };
            if let Err(rollback_err) = self.catalog.update(&id, &rollback) {
                error!(
                    "event=item_save module=library status=rollback_failed item_id={} error={} rollback_error={}",
                    id, write_err, rollback_err
                );
                return Err(LibraryError::InconsistentState(
                    "body write failed and catalog rollback failed",
                ));
            }
            warn!(
                "event=item_save module=library status=rolled_back item_id={} error={}",
                id, write_err
            );
            return Err(write_err.into());
        }

        let stored = self
            .catalog
            .get(&id)?
            .ok_or(LibraryError::InconsistentState(
                "saved item not found in read-back",
            ))?;
        info!(
            "event=item_save module=library status=ok item_id={} kind={} highlights={}",
            id,
            stored.kind.as_str(),
            stored.highlights.len()
        );
        session.mark_saved(stored.clone());
        Ok(stored)
    }

    /// Loads the demo library when the catalog is empty.
    ///
    /// Returns the number of records added (0 when the catalog was not
    /// empty).
    pub fn seed_demo(&mut self, today: NaiveDate) -> Result<usize, LibraryError> {
        if !self.catalog.list()?.is_empty() {
            return Ok(0);
        }
        let items = demo_items(today);
        let count = items.len();
        for item in items {
            self.catalog.append(item)?;
        }
        info!("event=library_seed module=library status=ok items={count}");
        Ok(count)
    }
}

/// Body shown for an item whose full text was never saved.
pub fn placeholder_body(item: &ItemMetadata) -> String {
    match item.kind {
        ItemKind::Note => format!(
            "{}\n\nThis is a placeholder for the full note content. You can expand on the excerpt here with more details, examples, and explanations related to \"{}\".",
            item.excerpt, item.title
        ),
        ItemKind::Document => format!(
            "{}\n\nThis is a placeholder for the full document content. You can expand on the excerpt here with the complete text of \"{}\".",
            item.excerpt, item.title
        ),
    }
}

fn sort_by_recency(items: &mut [ItemMetadata]) {
    items.sort_by(|left, right| {
        right
            .last_modified
            .cmp(&left.last_modified)
            .then_with(|| left.id.cmp(&right.id))
    });
}
