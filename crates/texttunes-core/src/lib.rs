#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    DEFAULT_VOICE_ID, Gender, MAX_TEXT_CHARS, PLACEHOLDER_CLIP_URL, ResourceLocator,
    SAMPLE_TEXTS, SpeechRequest, VoiceDescriptor, VoiceId, find_voice, validate_text,
    voice_catalog,
};
pub use error::{MediaError, SpeechError, ValidationError};
pub use ports::{
    DispatchOutcome, MediaElement, MediaEvent, MediaEvents, PlatformVoice, SpeechDispatchPort,
    SpeechEngine, SpeechParams, Utterance, UtteranceEvent, UtteranceEvents,
};
pub use settings::{
    DEFAULT_DOWNLOAD_FILE_NAME, DEFAULT_VOLUME, Settings, SettingsError, SettingsUpdate,
    validate_settings,
};

// Silence unused dev-dependency warnings until we add blocking-runtime tests
#[cfg(test)]
use tokio_test as _;
