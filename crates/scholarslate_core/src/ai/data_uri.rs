//! Self-describing base64 image payloads (`data:<mime>;base64,<data>`).

use crate::ai::AiError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt::{Display, Formatter};
use std::path::Path;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Image bytes plus their MIME type, carried as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUri {
    mime_type: String,
    data: String,
}

impl ImageDataUri {
    /// Encodes raw bytes. A blank MIME type falls back to `image/jpeg`.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let mime_type = mime_type.trim();
        let mime_type = if mime_type.is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            mime_type
        };
        Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parses `data:<mime>;base64,<payload>`.
    ///
    /// # Errors
    /// Returns `AiError::InvalidImage` when the prefix, MIME type, encoding
    /// marker or payload is missing or malformed.
    pub fn parse(value: &str) -> Result<Self, AiError> {
        let rest = value
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| invalid("missing `data:` prefix"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| invalid("missing `,` separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("payload must be base64 encoded"))?;
        if !mime_type.contains('/') {
            return Err(invalid(&format!("invalid MIME type `{mime_type}`")));
        }
        if payload.is_empty() {
            return Err(invalid("empty payload"));
        }
        STANDARD
            .decode(payload)
            .map_err(|err| invalid(&format!("bad base64 payload: {err}")))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Renders the full data URI string.
    pub fn to_uri(&self) -> String {
        self.to_string()
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>, AiError> {
        STANDARD
            .decode(&self.data)
            .map_err(|err| invalid(&format!("bad base64 payload: {err}")))
    }
}

impl Display for ImageDataUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Guesses an image MIME type from a file extension.
pub fn guess_image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => DEFAULT_IMAGE_MIME,
    }
}

fn invalid(message: &str) -> AiError {
    AiError::InvalidImage(message.to_string())
}
