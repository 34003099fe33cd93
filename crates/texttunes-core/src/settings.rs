//! Settings domain types and validation.
//!
//! This module contains the settings shared by the dispatcher, the playback
//! controller and the CLI. These are pure domain types with no
//! infrastructure dependencies; the CLI fills them from flags and the
//! environment.

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_VOICE_ID, MAX_TEXT_CHARS, VoiceId};

/// File name used when downloading the current clip.
pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "speech.wav";

/// Initial playback volume.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Voice identifier preselected in the picker.
    pub default_voice: Option<String>,

    /// Maximum characters per request.
    pub max_text_chars: Option<usize>,

    /// File name for downloaded clips.
    pub download_file_name: Option<String>,

    /// Initial playback volume (0.0–1.0).
    pub initial_volume: Option<f32>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            default_voice: Some(DEFAULT_VOICE_ID.to_string()),
            max_text_chars: Some(MAX_TEXT_CHARS),
            download_file_name: Some(DEFAULT_DOWNLOAD_FILE_NAME.to_string()),
            initial_volume: Some(DEFAULT_VOLUME),
        }
    }

    /// Get the effective default voice (with default fallback).
    pub fn effective_voice(&self) -> VoiceId {
        self.default_voice
            .as_deref()
            .and_then(|raw| VoiceId::parse(raw).ok())
            .unwrap_or_default()
    }

    /// Get the effective character limit (with default fallback).
    #[must_use]
    pub fn effective_max_text_chars(&self) -> usize {
        self.max_text_chars.unwrap_or(MAX_TEXT_CHARS)
    }

    /// Get the effective download file name (with default fallback).
    #[must_use]
    pub fn effective_download_file_name(&self) -> &str {
        self.download_file_name
            .as_deref()
            .unwrap_or(DEFAULT_DOWNLOAD_FILE_NAME)
    }

    /// Get the effective initial volume (with default fallback).
    #[must_use]
    pub fn effective_volume(&self) -> f32 {
        self.initial_volume.unwrap_or(DEFAULT_VOLUME)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref voice) = other.default_voice {
            self.default_voice.clone_from(voice);
        }
        if let Some(ref max) = other.max_text_chars {
            self.max_text_chars = *max;
        }
        if let Some(ref name) = other.download_file_name {
            self.download_file_name.clone_from(name);
        }
        if let Some(ref volume) = other.initial_volume {
            self.initial_volume = *volume;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub default_voice: Option<Option<String>>,
    pub max_text_chars: Option<Option<usize>>,
    pub download_file_name: Option<Option<String>>,
    pub initial_volume: Option<Option<f32>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid default voice: {0}")]
    InvalidVoice(String),

    #[error("Max text length must be between 1 and 5000, got {0}")]
    InvalidMaxTextChars(usize),

    #[error("Download file name cannot be empty or contain path separators")]
    InvalidDownloadFileName,

    #[error("Volume must be between 0.0 and 1.0, got {0}")]
    InvalidVolume(f32),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(ref voice) = settings.default_voice {
        if VoiceId::parse(voice).is_err() {
            return Err(SettingsError::InvalidVoice(voice.clone()));
        }
    }

    if let Some(max) = settings.max_text_chars {
        if !(1..=MAX_TEXT_CHARS).contains(&max) {
            return Err(SettingsError::InvalidMaxTextChars(max));
        }
    }

    if settings
        .download_file_name
        .as_ref()
        .is_some_and(|n| n.trim().is_empty() || n.contains(['/', '\\']))
    {
        return Err(SettingsError::InvalidDownloadFileName);
    }

    if let Some(volume) = settings.initial_volume {
        if !(0.0..=1.0).contains(&volume) {
            return Err(SettingsError::InvalidVolume(volume));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.default_voice.as_deref(), Some("en-US-female"));
        assert_eq!(settings.max_text_chars, Some(5000));
        assert_eq!(settings.download_file_name.as_deref(), Some("speech.wav"));
        assert_eq!(settings.initial_volume, Some(1.0));
    }

    #[test]
    fn test_validate_settings_valid() {
        assert!(validate_settings(&Settings::with_defaults()).is_ok());
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_effective_values_fall_back() {
        let settings = Settings::default();
        assert_eq!(settings.effective_voice(), VoiceId::default());
        assert_eq!(settings.effective_max_text_chars(), MAX_TEXT_CHARS);
        assert_eq!(settings.effective_download_file_name(), "speech.wav");
    }

    #[test]
    fn test_validate_invalid_voice() {
        let settings = Settings {
            default_voice: Some("klingon".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidVoice(_))
        ));
    }

    #[test]
    fn test_validate_max_text_chars_out_of_range() {
        for max in [0, MAX_TEXT_CHARS + 1] {
            let settings = Settings {
                max_text_chars: Some(max),
                ..Default::default()
            };
            assert!(matches!(
                validate_settings(&settings),
                Err(SettingsError::InvalidMaxTextChars(m)) if m == max
            ));
        }
    }

    #[test]
    fn test_validate_download_file_name() {
        for name in ["", "  ", "../speech.wav"] {
            let settings = Settings {
                download_file_name: Some(name.to_string()),
                ..Default::default()
            };
            assert!(matches!(
                validate_settings(&settings),
                Err(SettingsError::InvalidDownloadFileName)
            ));
        }
    }

    #[test]
    fn test_validate_volume_out_of_range() {
        let settings = Settings {
            initial_volume: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidVolume(_))
        ));
    }

    #[test]
    fn test_merge_updates_only_present_fields() {
        let mut settings = Settings::with_defaults();
        settings.merge(&SettingsUpdate {
            default_voice: Some(Some("de-DE-male".to_string())),
            initial_volume: Some(None),
            ..Default::default()
        });
        assert_eq!(settings.default_voice.as_deref(), Some("de-DE-male"));
        assert_eq!(settings.initial_volume, None);
        assert_eq!(settings.max_text_chars, Some(MAX_TEXT_CHARS));
    }

    #[test]
    fn test_settings_deserialize_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{"max_text_chars": 200}"#).unwrap();
        assert_eq!(settings.max_text_chars, Some(200));
        assert_eq!(settings.default_voice, None);
    }
}
