//! Domain model for study items and their manual highlights.
//!
//! # Responsibility
//! - Define catalog metadata shared by notes and documents.
//! - Define the manual highlight set edited during a session.
//! - Provide the built-in subject list.
//!
//! # Invariants
//! - Every catalog record is identified by an `ItemId` with a kind prefix.
//! - Highlight phrases are validated only when added.

pub mod highlight;
pub mod item;
pub mod subject;
