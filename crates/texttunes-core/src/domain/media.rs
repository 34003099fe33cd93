//! Resource locators consumed by the playback controller.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::MediaError;

/// Placeholder clip handed to the player after a conversion.
///
/// An 8 kHz mono 8-bit PCM WAV fragment. It is unrelated to the spoken text;
/// speech itself goes straight to the platform engine.
pub const PLACEHOLDER_CLIP_URL: &str = "data:audio/wav;base64,UklGRnoGAABXQVZFZm10IBAAAAABAAEAQB8AAEAfAAABAAgAZGF0YQoGAACBhYqFbF1fdJivrJBhNjVgodDbq2EcBj+a2/LDciUFLIHO8tiJNwgZaLvt559NEAxQp+PwtmMcBjiR1/LMeSwFJHfH8N2QQAoUXrTp66hVFApGn+DwwmIbBD2X2+q8eSECMn7C8N2SRQ0XXLPK";

/// Reference to playable audio data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    /// Inline `data:` URL payload.
    Data {
        /// MIME type from the URL header (`audio/wav`).
        mime: String,
        /// Decoded payload.
        bytes: Arc<[u8]>,
    },

    /// File on the local filesystem.
    File(PathBuf),
}

impl ResourceLocator {
    /// Parse a locator string.
    ///
    /// Accepts `data:` URLs (base64 or raw payload), `file://` URLs and plain
    /// paths. Network schemes are rejected.
    pub fn parse(raw: &str) -> Result<Self, MediaError> {
        let raw = raw.trim();

        if let Some(rest) = raw.strip_prefix("data:") {
            return parse_data_url(rest);
        }
        if let Some(path) = raw.strip_prefix("file://") {
            return Ok(Self::File(PathBuf::from(path)));
        }
        if raw.contains("://") {
            return Err(MediaError::Unsupported(raw.to_string()));
        }
        if raw.is_empty() {
            return Err(MediaError::Unsupported("empty locator".to_string()));
        }
        Ok(Self::File(PathBuf::from(raw)))
    }

    /// The built-in placeholder clip.
    pub fn placeholder() -> Self {
        // The constant is a well-formed base64 data URL.
        Self::parse(PLACEHOLDER_CLIP_URL).unwrap_or_else(|_| Self::Data {
            mime: "audio/wav".to_string(),
            bytes: Arc::from(Vec::new()),
        })
    }

    /// Build a locator from a filesystem path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// MIME type if known (data URLs only).
    pub fn mime(&self) -> Option<&str> {
        match self {
            Self::Data { mime, .. } => Some(mime),
            Self::File(_) => None,
        }
    }

    /// Load the full resource payload.
    pub async fn read_bytes(&self) -> Result<Vec<u8>, MediaError> {
        match self {
            Self::Data { bytes, .. } => Ok(bytes.to_vec()),
            Self::File(path) => tokio::fs::read(path).await.map_err(|source| MediaError::Io {
                path: path.clone(),
                source,
            }),
        }
    }

    /// Blocking variant of [`read_bytes`](Self::read_bytes) for audio threads.
    pub fn read_bytes_blocking(&self) -> Result<Vec<u8>, MediaError> {
        match self {
            Self::Data { bytes, .. } => Ok(bytes.to_vec()),
            Self::File(path) => std::fs::read(path).map_err(|source| MediaError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl FromStr for ResourceLocator {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data { mime, bytes } => write!(f, "data:{mime} ({} bytes)", bytes.len()),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse the part of a data URL after `data:`.
fn parse_data_url(rest: &str) -> Result<ResourceLocator, MediaError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MediaError::Decode("data URL has no payload separator".to_string()))?;

    let mut params = header.split(';');
    let mime = params
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("text/plain")
        .to_string();
    let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| MediaError::Decode(e.to_string()))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(ResourceLocator::Data {
        mime,
        bytes: Arc::from(bytes),
    })
}
