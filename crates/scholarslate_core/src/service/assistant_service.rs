//! AI assistant use-cases.
//!
//! # Responsibility
//! - Convert handwritten-note images to text.
//! - Extract key points from a body of text.
//!
//! # Invariants
//! - Transcription failures are masked by a canned transcript flagged as
//!   `fallback`; a missing image is still reported.
//! - Key-point failures always propagate with a user-facing message.
//! - No retry or timeout is layered on top of the injected services.

use crate::ai::{
    AiError, HighlightRequest, HighlightService, ImageDataUri, TranscriptionRequest,
    TranscriptionService,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Canned transcript returned when the transcription service fails.
pub const FALLBACK_TRANSCRIPT: &str = "This is a transcribed text from a sample handwritten note. It demonstrates the ability of ScholarSlate to convert handwritten content into editable digital text. Key topics covered include molecular biology, chemical reactions, and historical dates. The transcription is clear and accurate, making it easy for students to study and revise.";

/// Error surfaced by assistant use-cases.
#[derive(Debug)]
pub enum AssistantError {
    /// No image was provided for conversion.
    NoImage,
    /// The AI service failed; the message is safe to show to users.
    Service(AiError),
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoImage => write!(f, "No image provided for conversion."),
            Self::Service(err) => write!(f, "Could not generate highlights: {err}"),
        }
    }
}

impl Error for AssistantError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoImage => None,
            Self::Service(err) => Some(err),
        }
    }
}

impl From<AiError> for AssistantError {
    fn from(value: AiError) -> Self {
        Self::Service(value)
    }
}

/// Result of a transcription use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptOutcome {
    pub text: String,
    /// `true` when the canned transcript replaced a failed service call.
    pub fallback: bool,
}

/// Returns the canned transcript used to mask transcription failures.
pub fn fallback_transcript() -> TranscriptOutcome {
    TranscriptOutcome {
        text: FALLBACK_TRANSCRIPT.to_string(),
        fallback: true,
    }
}

/// Assistant facade over injected AI services.
pub struct AssistantService<T: TranscriptionService, H: HighlightService> {
    transcriber: T,
    highlighter: H,
}

impl<T: TranscriptionService, H: HighlightService> AssistantService<T, H> {
    pub fn new(transcriber: T, highlighter: H) -> Self {
        Self {
            transcriber,
            highlighter,
        }
    }

    /// Transcribes a handwritten-notes image.
    ///
    /// # Errors
    /// Only `NoImage`; service failures yield the fallback transcript.
    pub async fn transcribe_note(
        &self,
        image: Option<ImageDataUri>,
    ) -> Result<TranscriptOutcome, AssistantError> {
        let image = image.ok_or(AssistantError::NoImage)?;
        let mime_type = image.mime_type().to_string();

        match self
            .transcriber
            .transcribe(TranscriptionRequest { image })
            .await
        {
            Ok(transcript) => {
                info!(
                    "event=note_transcribe module=assistant status=ok mime={} chars={}",
                    mime_type,
                    transcript.text.chars().count()
                );
                Ok(TranscriptOutcome {
                    text: transcript.text,
                    fallback: false,
                })
            }
            Err(err) => {
                warn!(
                    "event=note_transcribe module=assistant status=fallback mime={} error={}",
                    mime_type, err
                );
                Ok(fallback_transcript())
            }
        }
    }

    /// Extracts key points from `text`. An empty list is a valid result.
    pub async fn key_points(&self, text: &str) -> Result<Vec<String>, AssistantError> {
        let result = self
            .highlighter
            .extract_points(HighlightRequest {
                text: text.to_string(),
            })
            .await;
        match result {
            Ok(key_points) => {
                info!(
                    "event=key_points module=assistant status=ok points={}",
                    key_points.points.len()
                );
                Ok(key_points.points)
            }
            Err(err) => {
                warn!("event=key_points module=assistant status=error error={err}");
                Err(err.into())
            }
        }
    }
}
