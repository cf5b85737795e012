//! AI service boundary.
//!
//! # Responsibility
//! - Define the request/response shapes of the transcription and key-point
//!   services.
//! - Define the async service traits that use-case services depend on.
//!
//! # Invariants
//! - Each call is a single request/response; no retry, timeout or
//!   cancellation policy is applied here.
//! - A response missing its payload field is a `MalformedResponse` failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod data_uri;
pub mod http;

pub use data_uri::ImageDataUri;

/// Transcription input: one handwritten-notes image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub image: ImageDataUri,
}

/// Transcription output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
}

/// Key-point extraction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRequest {
    pub text: String,
}

/// Key-point extraction output. `points` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPoints {
    pub points: Vec<String>,
}

/// Failure of one AI request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// Image payload is not a valid base64 data URI.
    InvalidImage(String),
    /// No backing service is configured.
    Unavailable(String),
    /// Network or protocol failure before a response was read.
    Transport(String),
    /// Service answered with a non-success status.
    Service { status: u16, message: String },
    /// Response body lacks the expected field or has the wrong shape.
    MalformedResponse(String),
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImage(message) => write!(f, "invalid image: {message}"),
            Self::Unavailable(message) => write!(f, "AI service unavailable: {message}"),
            Self::Transport(message) => write!(f, "AI request failed: {message}"),
            Self::Service { status, message } => {
                write!(f, "AI service returned status {status}: {message}")
            }
            Self::MalformedResponse(message) => {
                write!(f, "AI service returned an unexpected response: {message}")
            }
        }
    }
}

impl Error for AiError {}

/// Handwriting-to-text service.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcript, AiError>;
}

/// Key-point extraction service.
#[async_trait]
pub trait HighlightService: Send + Sync {
    async fn extract_points(&self, request: HighlightRequest) -> Result<KeyPoints, AiError>;
}

#[async_trait]
impl<T: TranscriptionService + ?Sized> TranscriptionService for Arc<T> {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcript, AiError> {
        (**self).transcribe(request).await
    }
}

#[async_trait]
impl<T: HighlightService + ?Sized> HighlightService for Arc<T> {
    async fn extract_points(&self, request: HighlightRequest) -> Result<KeyPoints, AiError> {
        (**self).extract_points(request).await
    }
}

/// Stand-in used when no AI endpoint is configured. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredAi;

const UNCONFIGURED_MESSAGE: &str = "set `ai.base_url` or SCHOLARSLATE_AI_URL";

#[async_trait]
impl TranscriptionService for UnconfiguredAi {
    async fn transcribe(&self, _request: TranscriptionRequest) -> Result<Transcript, AiError> {
        Err(AiError::Unavailable(UNCONFIGURED_MESSAGE.to_string()))
    }
}

#[async_trait]
impl HighlightService for UnconfiguredAi {
    async fn extract_points(&self, _request: HighlightRequest) -> Result<KeyPoints, AiError> {
        Err(AiError::Unavailable(UNCONFIGURED_MESSAGE.to_string()))
    }
}
