//! Regex-based highlight renderer.
//!
//! # Responsibility
//! - Split a body into plain and emphasized segments around highlight
//!   phrases.
//!
//! # Invariants
//! - Concatenating the segment texts reproduces the input exactly.
//! - Phrases are escaped and matched literally, case-insensitively, anywhere
//!   in the text (no word boundaries).
//! - The scan is single-pass and non-overlapping; it resumes right after each
//!   match.
//! - At one start position the longest phrase wins; equal lengths keep
//!   declaration order.

use log::warn;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const PATTERN_SIZE_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// One rendered piece of a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum RenderedSegment {
    /// Text outside any highlight.
    Plain(String),
    /// Text covered by one highlight match.
    Emphasized(String),
}

impl RenderedSegment {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Emphasized(text) => text.as_str(),
        }
    }

    pub fn is_emphasized(&self) -> bool {
        matches!(self, Self::Emphasized(_))
    }
}

/// Highlight phrases compiled into one alternation.
///
/// Build once per highlight set and reuse it across renders.
#[derive(Debug, Clone)]
pub struct HighlightMatcher {
    pattern: Option<Regex>,
}

impl HighlightMatcher {
    /// Compiles `phrases` into a matcher. Empty phrases and exact duplicates
    /// are dropped.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for phrase in phrases {
            let phrase = phrase.as_ref();
            if phrase.is_empty() || !seen.insert(phrase.to_string()) {
                continue;
            }
            ordered.push(phrase.to_string());
        }
        if ordered.is_empty() {
            return Self { pattern: None };
        }

        // Stable sort: equal lengths keep caller order.
        ordered.sort_by_key(|phrase| std::cmp::Reverse(phrase.chars().count()));
        let alternation = ordered
            .iter()
            .map(|phrase| regex::escape(phrase))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = match RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT_BYTES)
            .build()
        {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                warn!(
                    "event=highlight_compile module=highlight status=error phrases={} error={}",
                    ordered.len(),
                    err
                );
                None
            }
        };

        Self { pattern }
    }

    /// Returns whether at least one phrase is active.
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Splits `text` into plain and emphasized segments.
    pub fn render(&self, text: &str) -> Vec<RenderedSegment> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(pattern) = self.pattern.as_ref() else {
            return vec![RenderedSegment::Plain(text.to_string())];
        };

        let mut segments = Vec::new();
        let mut cursor = 0;
        for found in pattern.find_iter(text) {
            if found.start() > cursor {
                segments.push(RenderedSegment::Plain(
                    text[cursor..found.start()].to_string(),
                ));
            }
            segments.push(RenderedSegment::Emphasized(found.as_str().to_string()));
            cursor = found.end();
        }
        if cursor < text.len() {
            segments.push(RenderedSegment::Plain(text[cursor..].to_string()));
        }
        segments
    }
}

/// Renders `text` with `phrases` emphasized.
///
/// Convenience wrapper around [`HighlightMatcher`] for one-off renders.
pub fn render_highlights<S: AsRef<str>>(text: &str, phrases: &[S]) -> Vec<RenderedSegment> {
    HighlightMatcher::new(phrases.iter().map(AsRef::as_ref)).render(text)
}

/// Joins segments back into one string, wrapping emphasized text in markers.
pub fn join_with_markers(segments: &[RenderedSegment], open: &str, close: &str) -> String {
    let mut output = String::new();
    for segment in segments {
        match segment {
            RenderedSegment::Plain(text) => output.push_str(text),
            RenderedSegment::Emphasized(text) => {
                output.push_str(open);
                output.push_str(text);
                output.push_str(close);
            }
        }
    }
    output
}
