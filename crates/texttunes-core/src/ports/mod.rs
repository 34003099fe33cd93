//! Port definitions (trait abstractions) for platform capabilities.
//!
//! Ports define the interfaces that the core domain expects from the host.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No platform crate types (`tts`, `rodio`) in any signature
//! - Asynchronous platform callbacks are delivered over per-operation channels
//! - Intent-based methods (`speak`, `cancel`, `play`), not backend-leaking ones

pub mod media;
pub mod speech;

pub use media::{MediaElement, MediaEvent, MediaEvents};
pub use speech::{
    DispatchOutcome, PlatformVoice, SpeechDispatchPort, SpeechEngine, SpeechParams, Utterance,
    UtteranceEvent, UtteranceEvents, static_voices_receiver,
};
