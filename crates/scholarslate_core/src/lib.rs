//! Core domain logic for ScholarSlate.
//! This crate is the single source of truth for highlight and library
//! invariants; CLI and UI layers only call into it.

pub mod ai;
pub mod config;
pub mod db;
pub mod highlight;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use ai::{
    AiError, HighlightService, ImageDataUri, TranscriptionService, UnconfiguredAi,
};
pub use config::{AppConfig, ConfigError};
pub use highlight::render::{render_highlights, HighlightMatcher, RenderedSegment};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::highlight::{HighlightError, HighlightId, HighlightSet};
pub use model::item::{ItemId, ItemKind, ItemMetadata, MetadataPatch, NewItem};
pub use model::subject::Subject;
pub use repo::catalog_repo::{InMemoryItemCatalog, ItemCatalog, SqliteItemCatalog};
pub use repo::content_repo::{ContentStore, InMemoryContentStore, SqliteContentStore};
pub use repo::{RepoError, RepoResult};
pub use service::assistant_service::{AssistantError, AssistantService, TranscriptOutcome};
pub use service::library_service::{LibraryError, LibraryService, NewNoteRequest};
pub use service::session::EditSession;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
