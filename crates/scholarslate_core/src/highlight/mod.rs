//! Highlight rendering.
//!
//! # Responsibility
//! - Turn a body plus highlight phrases into display segments.
//!
//! # Invariants
//! - Rendering is pure and total over all string inputs.

pub mod render;
