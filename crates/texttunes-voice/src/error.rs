//! Playback and backend error types.

use std::path::PathBuf;

use texttunes_core::{MediaError, SpeechError};

/// Errors that can occur in the playback controller and platform adapters.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// A transport control was used with no resource loaded.
    #[error("No audio loaded")]
    NoResource,

    /// Seek target is not a finite number of seconds.
    #[error("Invalid seek position: {0}")]
    InvalidSeek(f64),

    /// Volume is not a finite number.
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// The media element rejected an operation.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// The speech engine could not be initialised or driven.
    #[error(transparent)]
    Speech(#[from] SpeechError),

    /// Audio thread died unexpectedly (channel closed).
    #[error("Audio thread died unexpectedly")]
    AudioThreadDied,

    /// Failed to write a downloaded clip.
    #[error("Failed to write {path}: {source}")]
    Download {
        path: PathBuf,
        source: std::io::Error,
    },
}
