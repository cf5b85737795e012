//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and AI calls into use-case level APIs.
//! - Keep CLI/UI layers decoupled from storage and transport details.

pub mod assistant_service;
pub mod library_service;
pub mod seed;
pub mod session;
