//! Speech dispatcher: voice match, speak, and resolve exactly once.
//!
//! The dispatcher owns the *utterance lease*: at most one utterance is active
//! at a time. Starting a new one cancels the platform queue and resolves the
//! previous caller with [`DispatchOutcome::Cancelled`].
//!
//! ```text
//!   speak(A) ──▶ lease(A) ──▶ engine.speak ──▶ Started ──▶ Finished ──▶ Completed
//!                  │
//!   speak(B) ──────┴──▶ cancel(A) ──▶ A resolves Cancelled, lease(B) ...
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use texttunes_core::{
    DispatchOutcome, PlatformVoice, SpeechDispatchPort, SpeechEngine, SpeechError, SpeechParams,
    SpeechRequest, Utterance, UtteranceEvent, UtteranceEvents,
};

use crate::matcher::select_voice;

/// Code reported when an engine drops an utterance without a terminal event.
pub const DISCONNECTED_CODE: &str = "disconnected";

// ── Identifiers & events ───────────────────────────────────────────

/// Identifies one dispatched utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtteranceId(u64);

impl UtteranceId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utt-{}", self.0)
    }
}

/// Events emitted by the dispatcher to the UI / application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// The platform started speaking.
    Started(UtteranceId),

    /// The platform finished speaking.
    Finished(UtteranceId),

    /// The platform reported an error.
    Failed { id: UtteranceId, code: String },

    /// The utterance was stopped or superseded.
    Cancelled(UtteranceId),
}

impl DispatchEvent {
    /// The utterance this event belongs to.
    #[must_use]
    pub const fn id(&self) -> UtteranceId {
        match self {
            Self::Started(id) | Self::Finished(id) | Self::Cancelled(id) => *id,
            Self::Failed { id, .. } => *id,
        }
    }
}

// ── Utterance lease ────────────────────────────────────────────────

/// The currently active utterance and the handle that cancels its caller.
struct ActiveUtterance {
    id: UtteranceId,
    cancel: oneshot::Sender<()>,
}

type LeaseSlot = Arc<Mutex<Option<ActiveUtterance>>>;

fn lock(slot: &Mutex<Option<ActiveUtterance>>) -> MutexGuard<'_, Option<ActiveUtterance>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the lease when the owning `speak` call ends, however it ends.
///
/// A call that is dropped before the platform settled its utterance (task
/// aborted, lost a `select!`) still holds the lease here; the guard then
/// flushes the platform queue so nothing keeps speaking unowned.
struct LeaseGuard {
    slot: LeaseSlot,
    id: UtteranceId,
    engine: Arc<dyn SpeechEngine>,
    event_tx: mpsc::UnboundedSender<DispatchEvent>,
    /// The platform reported a terminal event or rejected the utterance.
    settled: bool,
}

impl Drop for LeaseGuard {
    fn drop(&mut self) {
        let held = {
            let mut active = lock(&self.slot);
            if active.as_ref().is_some_and(|a| a.id == self.id) {
                *active = None;
                true
            } else {
                false
            }
        };

        if held && !self.settled {
            tracing::debug!(id = %self.id, "Utterance abandoned, cancelling platform speech");
            self.engine.cancel();
            let _ = self.event_tx.send(DispatchEvent::Cancelled(self.id));
        }
    }
}

// ── Dispatcher ─────────────────────────────────────────────────────

/// Speaks [`SpeechRequest`]s through a platform [`SpeechEngine`].
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct SpeechDispatcher {
    /// Platform engine; `None` when the host has no speech capability.
    engine: Option<Arc<dyn SpeechEngine>>,

    /// The single active utterance, if any.
    active: LeaseSlot,

    /// Source of utterance ids.
    next_id: AtomicU64,

    /// Event sender channel.
    event_tx: mpsc::UnboundedSender<DispatchEvent>,
}

impl SpeechDispatcher {
    /// Create a dispatcher over `engine`.
    ///
    /// Returns the dispatcher and a receiver for [`DispatchEvent`]s.
    #[must_use]
    pub fn new(
        engine: Option<Arc<dyn SpeechEngine>>,
    ) -> (Self, mpsc::UnboundedReceiver<DispatchEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            engine,
            active: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
            event_tx,
        };
        (dispatcher, event_rx)
    }

    /// Whether a speech engine is configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    /// Whether an utterance currently holds the lease.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        lock(&self.active).is_some()
    }

    /// Speak `request`, resolving once the platform finishes, fails, or the
    /// utterance is cancelled.
    pub async fn speak(&self, request: &SpeechRequest) -> Result<DispatchOutcome, SpeechError> {
        let engine = self
            .engine
            .clone()
            .ok_or(SpeechError::CapabilityUnavailable)?;

        let id = UtteranceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (cancel_tx, mut cancel_rx) = oneshot::channel();

        let previous = lock(&self.active).replace(ActiveUtterance {
            id,
            cancel: cancel_tx,
        });
        let mut lease = LeaseGuard {
            slot: Arc::clone(&self.active),
            id,
            engine: Arc::clone(&engine),
            event_tx: self.event_tx.clone(),
            settled: false,
        };
        if let Some(previous) = previous {
            tracing::debug!(superseded = %previous.id, by = %id, "Cancelling previous utterance");
            self.cancel_utterance(engine.as_ref(), previous);
        }

        let voices = engine.voices();
        let voice = select_voice(&voices, request.voice()).cloned();
        match &voice {
            Some(v) => tracing::debug!(%id, voice = %v.name, lang = %v.lang, "Matched platform voice"),
            None => {
                tracing::debug!(%id, wanted = %request.voice(), "No matching voice, using engine default");
            }
        }

        let utterance = Utterance {
            text: request.text().to_string(),
            voice,
            params: SpeechParams::FIXED,
        };
        let (events, mut event_rx) = UtteranceEvents::channel();

        tracing::info!(%id, voice = %request.voice(), chars = request.text().chars().count(), "Speaking");
        if let Err(e) = engine.speak(utterance, events) {
            lease.settled = true;
            return Err(e);
        }

        loop {
            tokio::select! {
                biased;

                _ = &mut cancel_rx => {
                    tracing::debug!(%id, "Utterance cancelled");
                    return Ok(DispatchOutcome::Cancelled);
                }

                event = event_rx.recv() => match event {
                    Some(UtteranceEvent::Started) => {
                        tracing::debug!(%id, "Utterance started");
                        self.emit(DispatchEvent::Started(id));
                    }
                    Some(UtteranceEvent::Finished) => {
                        tracing::info!(%id, "Utterance finished");
                        lease.settled = true;
                        self.emit(DispatchEvent::Finished(id));
                        return Ok(DispatchOutcome::Completed);
                    }
                    Some(UtteranceEvent::Error(code)) => {
                        lease.settled = true;
                        return Err(self.fail(id, code));
                    }
                    None => {
                        lease.settled = true;
                        return Err(self.fail(id, DISCONNECTED_CODE.to_string()));
                    }
                },
            }
        }
    }

    /// Cancel the active utterance, if any. Stopping when idle is a no-op.
    pub fn stop(&self) {
        let Some(engine) = self.engine.as_deref() else {
            return;
        };
        let previous = lock(&self.active).take();
        if let Some(previous) = previous {
            tracing::info!(id = %previous.id, "Stopping speech");
            self.cancel_utterance(engine, previous);
        }
    }

    /// Installed platform voices.
    ///
    /// Engines may enumerate lazily; when the first read is empty this waits
    /// for one catalog-change notification and reads again.
    pub async fn available_voices(&self) -> Result<Vec<PlatformVoice>, SpeechError> {
        let engine = self.engine()?;

        // Subscribe before reading so a change between the two is not lost.
        let mut changes = engine.subscribe_voices();
        let voices = engine.voices();
        if !voices.is_empty() {
            return Ok(voices);
        }

        tracing::debug!("Voice catalog empty, waiting for engine to populate it");
        if changes.changed().await.is_err() {
            return Ok(voices);
        }
        Ok(engine.voices())
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn engine(&self) -> Result<&dyn SpeechEngine, SpeechError> {
        self.engine
            .as_deref()
            .ok_or(SpeechError::CapabilityUnavailable)
    }

    /// Resolve `utterance`'s caller as cancelled and flush the platform queue.
    fn cancel_utterance(&self, engine: &dyn SpeechEngine, utterance: ActiveUtterance) {
        // The caller may already be gone (future dropped); that is fine.
        let _ = utterance.cancel.send(());
        engine.cancel();
        self.emit(DispatchEvent::Cancelled(utterance.id));
    }

    fn fail(&self, id: UtteranceId, code: String) -> SpeechError {
        tracing::warn!(%id, %code, "Speech synthesis failed");
        self.emit(DispatchEvent::Failed {
            id,
            code: code.clone(),
        });
        SpeechError::synthesis(code)
    }

    /// Emit a dispatch event (best-effort, the receiver may be dropped).
    fn emit(&self, event: DispatchEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Dispatch event receiver dropped");
        }
    }
}

#[async_trait]
impl SpeechDispatchPort for SpeechDispatcher {
    async fn speak(&self, request: &SpeechRequest) -> Result<DispatchOutcome, SpeechError> {
        Self::speak(self, request).await
    }

    fn stop(&self) {
        Self::stop(self);
    }

    async fn available_voices(&self) -> Result<Vec<PlatformVoice>, SpeechError> {
        Self::available_voices(self).await
    }
}

impl fmt::Debug for SpeechDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechDispatcher")
            .field("available", &self.is_available())
            .field("speaking", &self.is_speaking())
            .finish_non_exhaustive()
    }
}
