//! Item catalog domain model.
//!
//! # Responsibility
//! - Define the metadata record shared by notes and documents.
//! - Provide the sequence-based identifier scheme used by catalogs.
//!
//! # Invariants
//! - `ItemId` values carry the kind prefix (`n` for notes, `d` for documents).
//! - `highlights` holds manual highlight phrases in display order.
//! - Identifiers are unique within one catalog only, never globally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

const EXCERPT_MAX_CHARS: usize = 100;

/// Content category managed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Free-form study note written by the user.
    Note,
    /// Reference document (paper, syllabus, primary source).
    Document,
}

impl ItemKind {
    /// Prefix used when generating sequence-based identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Note => "n",
            Self::Document => "d",
        }
    }

    /// Stable lowercase label used by storage and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Document => "document",
        }
    }

    /// Parses the storage label back into a kind.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "note" => Some(Self::Note),
            "document" => Some(Self::Document),
            _ => None,
        }
    }
}

/// Catalog identifier such as `n1` or `d3`.
///
/// Ordering compares the letter prefix, then the trailing number
/// numerically (`n2` < `n10`), then the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds the `sequence`-th identifier for `kind`.
    pub fn sequence(kind: ItemKind, sequence: usize) -> Self {
        Self(format!("{}{sequence}", kind.id_prefix()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn sort_key(&self) -> (&str, Option<u64>) {
        let digits_at = self
            .0
            .find(|ch: char| ch.is_ascii_digit())
            .unwrap_or(self.0.len());
        let (prefix, digits) = self.0.split_at(digits_at);
        (prefix, digits.parse().ok())
    }
}

impl Ord for ItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Catalog record describing one note or document.
///
/// The full text body lives in the content store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub id: ItemId,
    /// Serialized as `type` to match the catalog wire shape.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    /// Display name of the owning subject (not the slug).
    pub subject: String,
    pub last_modified: NaiveDate,
    /// Short listing preview derived from the body at creation time.
    pub excerpt: String,
    /// Manual highlight phrases in display order.
    pub highlights: Vec<String>,
}

/// Input for appending a new catalog record. The catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub kind: ItemKind,
    pub title: String,
    pub subject: String,
    pub last_modified: NaiveDate,
    pub excerpt: String,
    pub highlights: Vec<String>,
}

impl NewItem {
    /// Materializes the catalog record once an id has been assigned.
    pub(crate) fn into_metadata(self, id: ItemId) -> ItemMetadata {
        ItemMetadata {
            id,
            kind: self.kind,
            title: self.title,
            subject: self.subject,
            last_modified: self.last_modified,
            excerpt: self.excerpt,
            highlights: self.highlights,
        }
    }
}

/// Partial metadata update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub last_modified: Option<NaiveDate>,
    pub excerpt: Option<String>,
    /// Replaces the whole highlight list when set.
    pub highlights: Option<Vec<String>>,
}

impl MetadataPatch {
    /// Applies every present field to `item`.
    pub fn apply_to(&self, item: &mut ItemMetadata) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(subject) = &self.subject {
            item.subject = subject.clone();
        }
        if let Some(date) = self.last_modified {
            item.last_modified = date;
        }
        if let Some(excerpt) = &self.excerpt {
            item.excerpt = excerpt.clone();
        }
        if let Some(highlights) = &self.highlights {
            item.highlights = highlights.clone();
        }
    }
}

/// Derives the listing excerpt for a body.
///
/// Keeps the first 100 characters and appends `...` when the body is longer.
pub fn derive_excerpt(content: &str) -> String {
    let mut excerpt = content.chars().take(EXCERPT_MAX_CHARS).collect::<String>();
    if content.chars().count() > EXCERPT_MAX_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}

/// Picks the next free sequence id for `kind`.
///
/// Starts at `count_of_kind + 1` and walks forward past ids that are already
/// taken, so ids stay unique inside one catalog.
pub fn next_item_id(
    kind: ItemKind,
    count_of_kind: usize,
    mut is_taken: impl FnMut(&ItemId) -> bool,
) -> ItemId {
    let mut sequence = count_of_kind + 1;
    loop {
        let candidate = ItemId::sequence(kind, sequence);
        if !is_taken(&candidate) {
            return candidate;
        }
        sequence += 1;
    }
}
