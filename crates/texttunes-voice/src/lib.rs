#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

#[cfg(feature = "audio")]
pub mod audio_thread;
pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod matcher;
#[cfg(feature = "audio")]
pub mod playback;
pub mod player;

// Re-export key types for convenience
pub use dispatcher::{DispatchEvent, SpeechDispatcher, UtteranceId};
pub use error::VoiceError;
pub use matcher::select_voice;
pub use player::{AudioPlayer, PlayerSnapshot, PlayerState, format_time};

#[cfg(feature = "audio")]
pub use audio_thread::LocalMediaElement;
#[cfg(feature = "system-tts")]
pub use backend::SystemSpeechEngine;

// Used only by integration tests
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
