//! Validated speech requests.

use serde::Serialize;

use crate::domain::voice::VoiceId;
use crate::error::ValidationError;

/// Maximum number of characters accepted for one request.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Quick sample texts offered next to the text input.
pub const SAMPLE_TEXTS: [&str; 3] = [
    "Welcome to our text-to-speech platform! Experience natural-sounding voices.",
    "The quick brown fox jumps over the lazy dog.",
    "Artificial intelligence is transforming how we interact with technology.",
];

/// Text plus the voice to speak it with.
///
/// Only constructible through [`SpeechRequest::new`], so a request that
/// reaches the dispatcher has already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    text: String,
    voice: VoiceId,
}

impl SpeechRequest {
    /// Validate `text` against `max_chars` and build a request.
    ///
    /// Length is counted in Unicode scalar values. The text is kept as typed
    /// (not trimmed); blank text is rejected.
    pub fn new(
        text: impl Into<String>,
        voice: VoiceId,
        max_chars: usize,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        validate_text(&text, max_chars)?;
        Ok(Self { text, voice })
    }

    /// Parse the voice identifier and validate the text in one step.
    pub fn parse(text: impl Into<String>, voice: &str, max_chars: usize) -> Result<Self, ValidationError> {
        let text = text.into();
        validate_text(&text, max_chars)?;
        let voice = VoiceId::parse(voice)?;
        Ok(Self { text, voice })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn voice(&self) -> &VoiceId {
        &self.voice
    }
}

/// Check that `text` is non-blank and at most `max_chars` characters.
pub fn validate_text(text: &str, max_chars: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let len = text.chars().count();
    if len > max_chars {
        return Err(ValidationError::TextTooLong { len, max: max_chars });
    }
    Ok(())
}
