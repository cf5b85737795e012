//! Editing session for one opened item.
//!
//! # Responsibility
//! - Hold the body and manual highlights of one item while it is edited.
//! - Render the body with its manual highlights.
//!
//! # Invariants
//! - Nothing in a session reaches the stores until the library saves it.
//! - Highlight phrases are validated against the body current at add time.
//! - Body edits never re-validate existing highlights.

use crate::highlight::render::{HighlightMatcher, RenderedSegment};
use crate::model::highlight::{HighlightEntry, HighlightError, HighlightId, HighlightSet};
use crate::model::item::{ItemId, ItemKind, ItemMetadata};

/// In-memory edit state for one note or document.
#[derive(Debug, Clone)]
pub struct EditSession {
    item: ItemMetadata,
    body: String,
    highlights: HighlightSet,
    dirty: bool,
}

impl EditSession {
    /// Starts a session from loaded metadata and body.
    pub fn new(item: ItemMetadata, body: String) -> Self {
        let highlights = HighlightSet::from_phrases(item.highlights.iter().cloned());
        Self {
            item,
            body,
            highlights,
            dirty: false,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.item.id
    }

    pub fn kind(&self) -> ItemKind {
        self.item.kind
    }

    /// Metadata as loaded (or as of the last save).
    pub fn item(&self) -> &ItemMetadata {
        &self.item
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.dirty = true;
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    /// Adds a manual highlight after checking it against the current body.
    pub fn add_highlight(&mut self, phrase: &str) -> Result<HighlightId, HighlightError> {
        let id = self.highlights.add(phrase, &self.body)?;
        self.dirty = true;
        Ok(id)
    }

    /// Removes a highlight by id. Unknown ids are ignored.
    pub fn remove_highlight(&mut self, id: HighlightId) -> Option<HighlightEntry> {
        let removed = self.highlights.remove(id);
        self.dirty |= removed.is_some();
        removed
    }

    /// Removes a highlight by display position. Out-of-range is ignored.
    pub fn remove_highlight_at(&mut self, index: usize) -> Option<HighlightEntry> {
        let removed = self.highlights.remove_at(index);
        self.dirty |= removed.is_some();
        removed
    }

    /// Renders the current body with the current manual highlights.
    pub fn render(&self) -> Vec<RenderedSegment> {
        HighlightMatcher::new(self.highlights.iter().map(|entry| entry.phrase.as_str()))
            .render(&self.body)
    }

    /// Returns whether the session holds unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_saved(&mut self, item: ItemMetadata) {
        self.item = item;
        self.dirty = false;
    }
}
