//! Speech engine port: the platform's speech synthesis and voice catalog.
//!
//! # Design Rules
//!
//! - The engine never owns dispatch policy. Cancelling the previous
//!   utterance, voice matching and completion tracking live in the
//!   dispatcher (`texttunes-voice`).
//! - Lifecycle callbacks travel through [`UtteranceEvents`], one channel per
//!   utterance, so an engine can fire them from any thread.
//! - An engine may populate its voice list lazily; it then bumps the
//!   generation published by [`SpeechEngine::subscribe_voices`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use crate::domain::SpeechRequest;
use crate::error::SpeechError;

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// A synthetic voice installed on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformVoice {
    /// Engine-specific identifier used to select the voice.
    pub id: String,
    /// Human-readable name (`Microsoft Zira - English (United States)`).
    pub name: String,
    /// BCP 47 language tag (`en-US`).
    pub lang: String,
    /// Whether the engine marks this as its default voice.
    pub is_default: bool,
}

impl PlatformVoice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            lang: lang.into(),
            is_default: false,
        }
    }
}

/// Rate, pitch and volume applied to an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    /// Speaking rate multiplier (1.0 = engine normal).
    pub rate: f32,
    /// Pitch multiplier (1.0 = engine normal).
    pub pitch: f32,
    /// Volume (0.0–1.0).
    pub volume: f32,
}

impl SpeechParams {
    /// The parameters every dispatched utterance uses.
    pub const FIXED: Self = Self {
        rate: 1.0,
        pitch: 1.0,
        volume: 1.0,
    };
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self::FIXED
    }
}

/// One request to the engine to vocalize text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak.
    pub text: String,
    /// Voice to use; `None` means the engine default.
    pub voice: Option<PlatformVoice>,
    /// Rate/pitch/volume.
    pub params: SpeechParams,
}

/// Lifecycle notifications for a single utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceEvent {
    /// Audio output began.
    Started,
    /// The utterance was spoken to the end.
    Finished,
    /// The engine failed; carries the platform error code.
    Error(String),
}

/// Sending half of an utterance's event channel, handed to the engine.
///
/// Sends are fire-and-forget: once the dispatcher stops listening (the
/// utterance was cancelled or superseded) further events are dropped.
#[derive(Debug, Clone)]
pub struct UtteranceEvents {
    tx: mpsc::UnboundedSender<UtteranceEvent>,
}

impl UtteranceEvents {
    /// Create a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UtteranceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn started(&self) {
        self.send(UtteranceEvent::Started);
    }

    pub fn finished(&self) {
        self.send(UtteranceEvent::Finished);
    }

    pub fn failed(&self, code: impl Into<String>) {
        self.send(UtteranceEvent::Error(code.into()));
    }

    /// Whether the listening side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, event: UtteranceEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Utterance listener gone, dropping event");
        }
    }
}

// ── Engine port ──────────────────────────────────────────────────────────────

/// Platform speech synthesis capability.
///
/// Implementations must be `Send + Sync`: the dispatcher is shared across
/// tasks and engine callbacks may fire on foreign threads.
pub trait SpeechEngine: Send + Sync {
    /// Current list of installed voices. May be empty until the engine has
    /// finished enumerating.
    fn voices(&self) -> Vec<PlatformVoice>;

    /// Subscribe to voice-list changes.
    ///
    /// The value is a generation counter bumped whenever [`voices`](Self::voices)
    /// may have changed. Engines whose catalog is static return a receiver
    /// whose sender is already dropped.
    fn subscribe_voices(&self) -> watch::Receiver<u64>;

    /// Queue `utterance` and report its lifecycle through `events`.
    ///
    /// Returning `Err` means nothing was queued and no events will follow.
    fn speak(&self, utterance: Utterance, events: UtteranceEvents) -> Result<(), SpeechError>;

    /// Cancel everything the engine is speaking or has queued.
    fn cancel(&self);
}

/// A receiver for engines with a fixed catalog (sender already dropped).
pub fn static_voices_receiver() -> watch::Receiver<u64> {
    let (_tx, rx) = watch::channel(0);
    rx
}

// ── Dispatch port ────────────────────────────────────────────────────────────

/// Terminal outcome of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchOutcome {
    /// The platform finished speaking the text.
    Completed,
    /// The utterance was stopped or superseded before it finished.
    Cancelled,
}

/// The surface the application layer uses to speak text.
///
/// Implemented by `texttunes_voice::SpeechDispatcher`; handlers depend on
/// this trait so they can be exercised with fakes.
#[async_trait]
pub trait SpeechDispatchPort: Send + Sync {
    /// Speak a validated request, resolving once with its terminal outcome.
    async fn speak(&self, request: &SpeechRequest) -> Result<DispatchOutcome, SpeechError>;

    /// Cancel the active utterance, if any. Never fails.
    fn stop(&self);

    /// Installed platform voices, waiting for the catalog to populate if the
    /// first read is empty.
    async fn available_voices(&self) -> Result<Vec<PlatformVoice>, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_params_are_unity() {
        let params = SpeechParams::default();
        assert!((params.rate - 1.0).abs() < f32::EPSILON);
        assert!((params.pitch - 1.0).abs() < f32::EPSILON);
        assert!((params.volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn events_after_listener_drop_are_ignored() {
        let (events, rx) = UtteranceEvents::channel();
        drop(rx);
        assert!(events.is_closed());
        // Must not panic.
        events.finished();
    }

    #[test]
    fn events_arrive_in_order() {
        let (events, mut rx) = UtteranceEvents::channel();
        events.started();
        events.failed("interrupted");

        assert_eq!(rx.try_recv().unwrap(), UtteranceEvent::Started);
        assert_eq!(
            rx.try_recv().unwrap(),
            UtteranceEvent::Error("interrupted".to_string())
        );
    }

    #[tokio::test]
    async fn static_receiver_reports_closed_sender() {
        let mut rx = static_voices_receiver();
        assert!(rx.changed().await.is_err());
    }
}
