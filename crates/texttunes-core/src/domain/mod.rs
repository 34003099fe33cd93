//! Pure domain types: voices, requests, and media locators.

pub mod media;
pub mod request;
pub mod voice;

pub use media::{PLACEHOLDER_CLIP_URL, ResourceLocator};
pub use request::{MAX_TEXT_CHARS, SAMPLE_TEXTS, SpeechRequest, validate_text};
pub use voice::{DEFAULT_VOICE_ID, Gender, VoiceDescriptor, VoiceId, find_voice, voice_catalog};
