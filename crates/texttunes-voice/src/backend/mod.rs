//! Platform adapters for the core ports.
//!
//! | Feature      | Module           | Port            |
//! |--------------|------------------|-----------------|
//! | `system-tts` | [`system_tts`]   | `SpeechEngine`  |
//! | `audio`      | `crate::audio_thread` | `MediaElement` |
//!
//! Both are off by default so the crate builds without Speech Dispatcher or
//! ALSA headers; without them the dispatcher reports the capability as
//! unavailable and hosts supply their own element.

#[cfg(feature = "system-tts")]
pub mod system_tts;

#[cfg(feature = "system-tts")]
pub use system_tts::SystemSpeechEngine;
