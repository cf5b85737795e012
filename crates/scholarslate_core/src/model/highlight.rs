//! Manual highlight set model.
//!
//! # Responsibility
//! - Hold the user-chosen highlight phrases of one editing session.
//! - Validate phrases against the current body at add time.
//!
//! # Invariants
//! - A phrase is accepted only if, once trimmed, it is non-empty and occurs as
//!   an exact case-sensitive substring of the body passed to `add`.
//! - Failed adds never change the set.
//! - Entries are never re-validated after the body changes.
//! - Every entry has a stable `HighlightId` for its in-memory lifetime.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable per-entry identifier generated when a phrase is added.
pub type HighlightId = Uuid;

/// Validation failure for a highlight add request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// Phrase is empty or whitespace-only.
    EmptyPhrase,
    /// Phrase does not occur in the current body.
    NotFound { phrase: String },
}

impl Display for HighlightError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPhrase => write!(f, "highlight text cannot be empty"),
            Self::NotFound { phrase } => {
                write!(f, "text not found in content: `{phrase}`")
            }
        }
    }
}

impl Error for HighlightError {}

/// One manual highlight phrase with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightEntry {
    pub id: HighlightId,
    pub phrase: String,
}

/// Ordered set of manual highlights. Order is display order only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    entries: Vec<HighlightEntry>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a set from persisted phrases without validating them.
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = phrases
            .into_iter()
            .map(|phrase| HighlightEntry {
                id: Uuid::new_v4(),
                phrase: phrase.into(),
            })
            .collect();
        Self { entries }
    }

    /// Appends `phrase` if it occurs verbatim in `body`.
    ///
    /// # Errors
    /// - `EmptyPhrase` when the trimmed phrase is empty.
    /// - `NotFound` when the trimmed phrase is not a substring of `body`.
    pub fn add(&mut self, phrase: &str, body: &str) -> Result<HighlightId, HighlightError> {
        let trimmed = phrase.trim();
        if trimmed.is_empty() {
            return Err(HighlightError::EmptyPhrase);
        }
        if !body.contains(trimmed) {
            return Err(HighlightError::NotFound {
                phrase: trimmed.to_string(),
            });
        }

        let id = Uuid::new_v4();
        self.entries.push(HighlightEntry {
            id,
            phrase: trimmed.to_string(),
        });
        Ok(id)
    }

    /// Removes the entry with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: HighlightId) -> Option<HighlightEntry> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(position))
    }

    /// Removes the entry at `index`. Out-of-range indices are a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<HighlightEntry> {
        if index >= self.entries.len() {
            return None;
        }
        Some(self.entries.remove(index))
    }

    pub fn entries(&self) -> &[HighlightEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighlightEntry> {
        self.entries.iter()
    }

    /// Phrases in display order, as stored in the catalog.
    pub fn phrases(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.phrase.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{HighlightError, HighlightSet};
    use uuid::Uuid;

    const BODY: &str = "The storming of the Bastille was pivotal";

    #[test]
    fn add_rejects_blank_phrases() {
        let mut set = HighlightSet::new();
        assert_eq!(set.add("", BODY), Err(HighlightError::EmptyPhrase));
        assert_eq!(set.add("   ", BODY), Err(HighlightError::EmptyPhrase));
        assert_eq!(set.add("   ", "   "), Err(HighlightError::EmptyPhrase));
        assert!(set.is_empty());
    }

    #[test]
    fn add_checks_existence_case_sensitively() {
        let mut set = HighlightSet::new();
        set.add("Bastille", BODY).expect("exact substring should be accepted");

        let err = set.add("bastille", BODY).expect_err("wrong case must fail");
        assert_eq!(
            err,
            HighlightError::NotFound {
                phrase: "bastille".to_string()
            }
        );
        assert_eq!(set.phrases(), vec!["Bastille".to_string()]);
    }

    #[test]
    fn add_stores_trimmed_phrase() {
        let mut set = HighlightSet::new();
        set.add("  storming  ", BODY).unwrap();
        assert_eq!(set.phrases(), vec!["storming".to_string()]);
    }

    #[test]
    fn remove_by_id_is_stable_across_earlier_removals() {
        let mut set = HighlightSet::new();
        let first = set.add("The", BODY).unwrap();
        let second = set.add("storming", BODY).unwrap();
        let third = set.add("pivotal", BODY).unwrap();

        set.remove(first).unwrap();
        let removed = set.remove(third).unwrap();
        assert_eq!(removed.phrase, "pivotal");
        assert_eq!(set.entries()[0].id, second);
        assert!(set.remove(Uuid::new_v4()).is_none());
    }

    #[test]
    fn remove_at_out_of_range_is_noop() {
        let mut set = HighlightSet::from_phrases(["one", "two"]);
        assert!(set.remove_at(2).is_none());
        assert_eq!(set.len(), 2);
        assert_eq!(set.remove_at(0).map(|entry| entry.phrase), Some("one".into()));
    }
}
