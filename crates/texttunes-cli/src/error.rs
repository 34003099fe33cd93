//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from the speech, playback and settings errors to exit codes and
//! user-facing messages.

use texttunes_core::{MediaError, SettingsError, SpeechError, ValidationError};
use texttunes_voice::VoiceError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input rejected before anything was spoken.
    #[error("{0}")]
    Validation(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// A platform capability is missing (no synthesizer, no audio device).
    #[error("{0}")]
    Unavailable(String),

    /// The speech engine reported a failure.
    #[error("Failed to generate speech. Please try again. ({0})")]
    Speech(String),

    /// Playback failed.
    #[error("Playback error: {0}")]
    Playback(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Speech(_) | Self::Playback(_) => 1,
            Self::Arguments(_) => 2,    // EX_USAGE
            Self::Validation(_) => 65,  // EX_DATAERR
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,          // EX_IOERR
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidVoiceId(_) => Self::Arguments(err.to_string()),
            ValidationError::EmptyText | ValidationError::TextTooLong { .. } => {
                Self::Validation(err.to_string())
            }
        }
    }
}

impl From<SpeechError> for CliError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::CapabilityUnavailable => Self::Unavailable(format!(
                "{err} (is a speech synthesizer installed? build with --features system-tts)"
            )),
            SpeechError::Synthesis { code } => Self::Speech(code),
            SpeechError::Validation(v) => v.into(),
        }
    }
}

impl From<MediaError> for CliError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Io { .. } => Self::Io(err.to_string()),
            MediaError::Unsupported(_) => Self::Arguments(err.to_string()),
            MediaError::Decode(_) | MediaError::Output(_) => Self::Playback(err.to_string()),
        }
    }
}

impl From<VoiceError> for CliError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Media(media) => media.into(),
            VoiceError::Speech(speech) => speech.into(),
            VoiceError::Download { .. } => Self::Io(err.to_string()),
            VoiceError::InvalidSeek(_) | VoiceError::InvalidVolume(_) => {
                Self::Arguments(err.to_string())
            }
            VoiceError::NoResource | VoiceError::AudioThreadDied => {
                Self::Playback(err.to_string())
            }
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keeps_user_message() {
        let err: CliError = SpeechError::Validation(ValidationError::EmptyText).into();
        assert_eq!(
            err.to_string(),
            "Please enter some text to convert to speech."
        );
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_capability_unavailable_exit_code() {
        let err: CliError = SpeechError::CapabilityUnavailable.into();
        assert_eq!(err.exit_code(), 69);
    }

    #[test]
    fn test_synthesis_failure_message() {
        let err: CliError = SpeechError::synthesis("network").into();
        assert!(err.to_string().starts_with("Failed to generate speech. Please try again."));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_voice_is_usage_error() {
        let err: CliError = ValidationError::InvalidVoiceId("klingon".into()).into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_settings_error_is_config() {
        let err: CliError = SettingsError::InvalidVolume(3.0).into();
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_voice_error_mapping() {
        let err: CliError = VoiceError::NoResource.into();
        assert!(matches!(err, CliError::Playback(_)));

        let err: CliError = VoiceError::Media(MediaError::Unsupported("https://x".into())).into();
        assert_eq!(err.exit_code(), 2);
    }
}
