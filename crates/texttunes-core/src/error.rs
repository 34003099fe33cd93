//! Speech dispatch, request validation, and media errors.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a speech request is rejected before any platform call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Text is empty or whitespace-only.
    #[error("Please enter some text to convert to speech.")]
    EmptyText,

    /// Text exceeds the character limit.
    #[error("Please limit your text to {max} characters or less (got {len}).")]
    TextTooLong { len: usize, max: usize },

    /// Voice identifier is not a `language-REGION-gender` token.
    #[error("Invalid voice identifier '{0}' (expected e.g. 'en-US-female')")]
    InvalidVoiceId(String),
}

/// Errors surfaced by the speech dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// The host has no speech synthesis capability.
    #[error("Speech synthesis not supported on this platform")]
    CapabilityUnavailable,

    /// The platform reported an error while speaking.
    #[error("Speech synthesis error: {code}")]
    Synthesis {
        /// Platform-supplied error code or message.
        code: String,
    },

    /// The request failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SpeechError {
    /// Shorthand for a [`SpeechError::Synthesis`] with the given code.
    pub fn synthesis(code: impl Into<String>) -> Self {
        Self::Synthesis { code: code.into() }
    }
}

/// Errors raised by media elements and resource locators.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The locator scheme is not supported (e.g. network URLs).
    #[error("Unsupported resource locator: {0}")]
    Unsupported(String),

    /// The resource could not be decoded.
    #[error("Failed to decode audio resource: {0}")]
    Decode(String),

    /// The audio output could not be opened or driven.
    #[error("Audio output error: {0}")]
    Output(String),

    /// The resource file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_carry_user_messages() {
        assert_eq!(
            ValidationError::EmptyText.to_string(),
            "Please enter some text to convert to speech."
        );
        let err = ValidationError::TextTooLong { len: 5001, max: 5000 };
        assert!(err.to_string().contains("5000 characters or less"));
    }

    #[test]
    fn validation_converts_into_speech_error() {
        let err: SpeechError = ValidationError::EmptyText.into();
        assert!(matches!(err, SpeechError::Validation(ValidationError::EmptyText)));
    }

    #[test]
    fn synthesis_error_includes_code() {
        let err = SpeechError::synthesis("audio-busy");
        assert_eq!(err.to_string(), "Speech synthesis error: audio-busy");
    }
}
