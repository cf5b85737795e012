//! JSON-over-HTTP client for a hosted AI endpoint.
//!
//! # Responsibility
//! - Send transcription and key-point requests to `{base_url}/transcribe` and
//!   `{base_url}/highlight-points`.
//! - Download remote images into self-describing data URIs.
//!
//! # Invariants
//! - Response bodies are deserialized into typed responses; missing or
//!   mistyped fields are `MalformedResponse`, never defaulted.
//! - No retries. The default `reqwest` client settings apply.

use crate::ai::{
    AiError, HighlightRequest, HighlightService, ImageDataUri, KeyPoints, Transcript,
    TranscriptionRequest, TranscriptionService,
};
use async_trait::async_trait;
use log::{error, info};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use std::time::Instant;

const TRANSCRIBE_PATH: &str = "transcribe";
const HIGHLIGHT_PATH: &str = "highlight-points";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for one AI endpoint base URL.
#[derive(Debug, Clone)]
pub struct HttpAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Downloads `url` and wraps the bytes as an image data URI.
    ///
    /// The MIME type comes from the `content-type` header, defaulting to
    /// `image/jpeg`.
    pub async fn fetch_image(&self, url: &str) -> Result<ImageDataUri, AiError> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Service {
                status: status.as_u16(),
                message: format!(
                    "failed to fetch image: {}",
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            });
        }
        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(ImageDataUri::from_bytes(&mime_type, &bytes))
    }

    async fn post_json(&self, path: &'static str, body: Value) -> Result<Value, AiError> {
        let started_at = Instant::now();
        let url = format!("{}/{path}", self.base_url);
        info!("event=ai_request module=ai status=start endpoint={path}");

        let result = self.send_json(&url, body).await;
        match &result {
            Ok(_) => info!(
                "event=ai_request module=ai status=ok endpoint={path} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=ai_request module=ai status=error endpoint={path} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    async fn send_json(&self, url: &str, body: Value) -> Result<Value, AiError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::Service {
                status: status.as_u16(),
                message: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|err| AiError::MalformedResponse(err.to_string()))
    }
}

#[async_trait]
impl TranscriptionService for HttpAiClient {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcript, AiError> {
        let body = json!({ "image": request.image.to_uri() });
        let value = self.post_json(TRANSCRIBE_PATH, body).await?;
        parse_transcript(value)
    }
}

#[async_trait]
impl HighlightService for HttpAiClient {
    async fn extract_points(&self, request: HighlightRequest) -> Result<KeyPoints, AiError> {
        let body = json!({ "text": request.text });
        let value = self.post_json(HIGHLIGHT_PATH, body).await?;
        parse_key_points(value)
    }
}

/// Validates a `{ "text": string }` transcription response.
pub fn parse_transcript(value: Value) -> Result<Transcript, AiError> {
    serde_json::from_value(value).map_err(malformed)
}

/// Validates a `{ "points": [string] }` key-point response.
pub fn parse_key_points(value: Value) -> Result<KeyPoints, AiError> {
    serde_json::from_value(value).map_err(malformed)
}

fn malformed(err: serde_json::Error) -> AiError {
    AiError::MalformedResponse(err.to_string())
}

fn transport(err: reqwest::Error) -> AiError {
    AiError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse_key_points, parse_transcript, HttpAiClient};
    use crate::ai::AiError;
    use serde_json::json;

    #[test]
    fn transcript_requires_text_field() {
        let parsed = parse_transcript(json!({ "text": "Helicase unwinds DNA" })).unwrap();
        assert_eq!(parsed.text, "Helicase unwinds DNA");

        let err = parse_transcript(json!({ "output": "x" })).unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse(_)));
    }

    #[test]
    fn key_points_accept_empty_list() {
        let parsed = parse_key_points(json!({ "points": [] })).unwrap();
        assert!(parsed.points.is_empty());
    }

    #[test]
    fn key_points_reject_missing_or_mistyped_field() {
        for value in [
            json!({}),
            json!({ "points": "one" }),
            json!({ "points": ["one", 2] }),
        ] {
            let err = parse_key_points(value).unwrap_err();
            assert!(matches!(err, AiError::MalformedResponse(_)));
        }
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = HttpAiClient::new("http://localhost:8080/ai/");
        assert_eq!(client.base_url(), "http://localhost:8080/ai");
    }
}
