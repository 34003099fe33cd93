//! OS speech synthesis via the [`tts`] crate.
//!
//! Speech Dispatcher on Linux, SAPI/WinRT on Windows, AVFoundation on macOS.
//! The `tts::Tts` handle lives on a dedicated thread and is driven through
//! [`SpeechCommand`]s, the same actor shape as the media thread.
//!
//! Utterance lifecycle comes from the crate's begin/end/stop callbacks when
//! the backend supports them. Otherwise the thread polls `is_speaking`; with
//! neither available the utterance is reported finished as soon as it is
//! queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc};
use std::thread;
use std::time::Duration;

use tokio::sync::watch;
use tts::{Features, Tts, UtteranceId, Voice};

use texttunes_core::{
    PlatformVoice, SpeechEngine, SpeechError, SpeechParams, Utterance, UtteranceEvents,
    static_voices_receiver,
};

use crate::error::VoiceError;

/// How often `is_speaking` is polled on backends without callbacks.
const POLL: Duration = Duration::from_millis(100);

/// Error code reported when the platform stops an utterance on its own.
const INTERRUPTED_CODE: &str = "interrupted";

/// Error code reported when the platform rejects an utterance.
const SYNTHESIS_FAILED_CODE: &str = "synthesis-failed";

/// How many cancelled utterance ids are remembered for late callbacks.
const RETIRED_CAP: usize = 16;

// ── Commands ───────────────────────────────────────────────────────

enum SpeechCommand {
    Speak {
        utterance: Utterance,
        events: UtteranceEvents,
        reply: mpsc::Sender<Result<(), SpeechError>>,
    },
    Cancel,
    Shutdown,
}

/// Utterance bookkeeping shared between the speech thread and callbacks.
type SharedTracker = Arc<Mutex<Tracker<UtteranceId>>>;

// ── Utterance tracking ─────────────────────────────────────────────

/// The utterance being spoken.
struct Current<Id> {
    /// Platform id, once `speak` returned one.
    id: Option<Id>,
    events: UtteranceEvents,
}

/// Routes platform callbacks to the utterance they belong to.
///
/// Backends such as Speech Dispatcher deliver callbacks asynchronously, so a
/// stop callback for a cancelled utterance can arrive after its successor
/// was queued. Cancelled ids are retired and their callbacks dropped.
struct Tracker<Id> {
    current: Option<Current<Id>>,
    retired: Vec<Id>,
}

impl<Id> Default for Tracker<Id> {
    fn default() -> Self {
        Self {
            current: None,
            retired: Vec::new(),
        }
    }
}

impl<Id: Copy + PartialEq> Tracker<Id> {
    /// Make `events` the current utterance; its id is not known yet.
    fn begin(&mut self, events: UtteranceEvents) {
        self.current = Some(Current { id: None, events });
    }

    /// Record the id the platform assigned to the current utterance.
    fn assign(&mut self, id: Option<Id>) {
        if let Some(current) = self.current.as_mut() {
            current.id = id;
        }
    }

    /// Detach the current utterance; late callbacks for it are ignored.
    fn retire_current(&mut self) {
        if let Some(id) = self.current.take().and_then(|c| c.id) {
            if self.retired.len() == RETIRED_CAP {
                self.retired.remove(0);
            }
            self.retired.push(id);
        }
    }

    /// Events of the current utterance if a callback for `id` concerns it.
    fn owner(&self, id: Id) -> Option<&UtteranceEvents> {
        if self.retired.contains(&id) {
            return None;
        }
        self.current
            .as_ref()
            .filter(|c| c.id.is_none_or(|own| own == id))
            .map(|c| &c.events)
    }

    /// Take the current utterance's events on a terminal callback for `id`.
    fn settle(&mut self, id: Id) -> Option<UtteranceEvents> {
        if let Some(pos) = self.retired.iter().position(|r| *r == id) {
            self.retired.swap_remove(pos);
            return None;
        }
        self.owner(id)?;
        self.current.take().map(|c| c.events)
    }

    /// Take the current utterance's events regardless of id (polling path).
    fn take(&mut self) -> Option<UtteranceEvents> {
        self.current.take().map(|c| c.events)
    }
}

// ── Engine handle ──────────────────────────────────────────────────

/// [`SpeechEngine`] backed by the host's speech synthesizer.
pub struct SystemSpeechEngine {
    cmd_tx: mpsc::Sender<SpeechCommand>,

    /// Voice list, enumerated once at start-up.
    voices: Vec<PlatformVoice>,

    thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl SystemSpeechEngine {
    /// Spawn the speech thread and initialise the platform synthesizer.
    ///
    /// Fails with [`SpeechError::CapabilityUnavailable`] when the host has
    /// no usable synthesizer.
    pub fn spawn() -> Result<Self, VoiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SpeechCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<Vec<PlatformVoice>, SpeechError>>();

        let thread = thread::Builder::new()
            .name("texttunes-speech".into())
            .spawn(move || run(&cmd_rx, &init_tx))
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to spawn speech thread");
                VoiceError::Speech(SpeechError::CapabilityUnavailable)
            })?;

        let voices = init_rx.recv().map_err(|_| VoiceError::AudioThreadDied)??;
        tracing::info!(voices = voices.len(), "System speech engine ready");

        Ok(Self {
            cmd_tx,
            voices,
            thread: Mutex::new(Some(thread)),
        })
    }
}

impl SpeechEngine for SystemSpeechEngine {
    fn voices(&self) -> Vec<PlatformVoice> {
        self.voices.clone()
    }

    fn subscribe_voices(&self) -> watch::Receiver<u64> {
        static_voices_receiver()
    }

    fn speak(&self, utterance: Utterance, events: UtteranceEvents) -> Result<(), SpeechError> {
        let (reply, rx) = mpsc::channel();
        self.cmd_tx
            .send(SpeechCommand::Speak {
                utterance,
                events,
                reply,
            })
            .map_err(|_| SpeechError::CapabilityUnavailable)?;
        rx.recv().map_err(|_| SpeechError::CapabilityUnavailable)?
    }

    fn cancel(&self) {
        if self.cmd_tx.send(SpeechCommand::Cancel).is_err() {
            tracing::warn!("Speech thread is gone, cancel dropped");
        }
    }
}

impl Drop for SystemSpeechEngine {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(SpeechCommand::Shutdown);
        let handle = self
            .thread
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

// ── Speech thread ──────────────────────────────────────────────────

/// State owned by the speech thread.
struct Synth {
    tts: Tts,
    features: Features,
    voices: Vec<Voice>,
    default_voice: Option<Voice>,
    tracker: SharedTracker,
    /// Set while polling `is_speaking` for a backend without callbacks.
    polling: bool,
}

fn run(
    cmd_rx: &mpsc::Receiver<SpeechCommand>,
    init_tx: &mpsc::Sender<Result<Vec<PlatformVoice>, SpeechError>>,
) {
    let mut synth = match Synth::new() {
        Ok(s) => s,
        Err(e) => {
            let _ = init_tx.send(Err(e));
            return;
        }
    };

    if init_tx.send(Ok(synth.platform_voices())).is_err() {
        return;
    }

    loop {
        let cmd = match cmd_rx.recv_timeout(POLL) {
            Ok(cmd) => cmd,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                synth.poll();
                continue;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match cmd {
            SpeechCommand::Speak {
                utterance,
                events,
                reply,
            } => {
                let _ = reply.send(synth.speak(utterance, events));
            }
            SpeechCommand::Cancel => synth.cancel(),
            SpeechCommand::Shutdown => break,
        }
    }

    synth.cancel();
    tracing::debug!("Speech thread shutting down");
}

impl Synth {
    fn new() -> Result<Self, SpeechError> {
        let tts = Tts::default().map_err(|e| {
            tracing::warn!(error = %e, "No platform speech synthesizer");
            SpeechError::CapabilityUnavailable
        })?;
        let features = tts.supported_features();

        let voices = if features.voice {
            tts.voices().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to enumerate platform voices");
                Vec::new()
            })
        } else {
            Vec::new()
        };
        let default_voice = if features.get_voice {
            tts.voice().ok().flatten()
        } else {
            None
        };

        let synth = Self {
            tts,
            features,
            voices,
            default_voice,
            tracker: Arc::new(Mutex::new(Tracker::default())),
            polling: false,
        };
        synth.install_callbacks();
        Ok(synth)
    }

    fn platform_voices(&self) -> Vec<PlatformVoice> {
        let default_id = self.default_voice.as_ref().map(Voice::id);
        self.voices
            .iter()
            .map(|v| PlatformVoice {
                id: v.id(),
                name: v.name(),
                lang: v.language().to_string(),
                is_default: default_id.as_deref() == Some(v.id().as_str()),
            })
            .collect()
    }

    fn install_callbacks(&self) {
        if !self.features.utterance_callbacks {
            return;
        }

        let tracker = Arc::clone(&self.tracker);
        let begin = self.tts.on_utterance_begin(Some(Box::new(move |id| {
            if let Some(events) = lock(&tracker).owner(id) {
                events.started();
            }
        })));

        let tracker = Arc::clone(&self.tracker);
        let end = self.tts.on_utterance_end(Some(Box::new(move |id| {
            if let Some(events) = lock(&tracker).settle(id) {
                events.finished();
            }
        })));

        let tracker = Arc::clone(&self.tracker);
        let stop = self.tts.on_utterance_stop(Some(Box::new(move |id| {
            if let Some(events) = lock(&tracker).settle(id) {
                events.failed(INTERRUPTED_CODE);
            }
        })));

        for result in [begin, end, stop] {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to register utterance callback");
            }
        }
    }

    fn speak(&mut self, utterance: Utterance, events: UtteranceEvents) -> Result<(), SpeechError> {
        self.apply_voice(utterance.voice.as_ref());
        self.apply_params(utterance.params);

        // Install the listener before speaking so an early begin callback
        // is not lost.
        lock(&self.tracker).begin(events.clone());

        match self.tts.speak(&utterance.text, true) {
            Ok(id) => lock(&self.tracker).assign(id),
            Err(e) => {
                tracing::warn!(error = %e, "Platform rejected utterance");
                lock(&self.tracker).take();
                return Err(SpeechError::synthesis(SYNTHESIS_FAILED_CODE));
            }
        }

        if !self.features.utterance_callbacks {
            events.started();
            if self.features.is_speaking {
                self.polling = true;
            } else {
                tracing::warn!("Speech backend cannot report completion; assuming finished");
                lock(&self.tracker).take();
                events.finished();
            }
        }
        Ok(())
    }

    fn cancel(&mut self) {
        self.polling = false;
        // Detach first: a stop callback must not report on a cancelled utterance.
        lock(&self.tracker).retire_current();
        if self.features.stop {
            if let Err(e) = self.tts.stop() {
                tracing::debug!(error = %e, "Failed to stop platform speech");
            }
        }
    }

    /// Completion detection for backends without callbacks.
    fn poll(&mut self) {
        if !self.polling {
            return;
        }
        match self.tts.is_speaking() {
            Ok(true) => {}
            Ok(false) => {
                self.polling = false;
                if let Some(events) = lock(&self.tracker).take() {
                    events.finished();
                }
            }
            Err(e) => {
                self.polling = false;
                tracing::warn!(error = %e, "Failed to query speaking state");
                if let Some(events) = lock(&self.tracker).take() {
                    events.failed(SYNTHESIS_FAILED_CODE);
                }
            }
        }
    }

    fn apply_voice(&mut self, wanted: Option<&PlatformVoice>) {
        if !self.features.voice {
            return;
        }
        let voice = match wanted {
            Some(wanted) => self.voices.iter().find(|v| v.id() == wanted.id),
            None => self.default_voice.as_ref(),
        };
        if let Some(voice) = voice {
            if let Err(e) = self.tts.set_voice(voice) {
                tracing::warn!(voice = %voice.name(), error = %e, "Failed to select voice");
            }
        }
    }

    /// Scale the normalised parameters onto the backend's native ranges.
    fn apply_params(&mut self, params: SpeechParams) {
        if self.features.rate {
            let rate = (self.tts.normal_rate() * params.rate)
                .clamp(self.tts.min_rate(), self.tts.max_rate());
            let _ = self.tts.set_rate(rate);
        }
        if self.features.pitch {
            let pitch = (self.tts.normal_pitch() * params.pitch)
                .clamp(self.tts.min_pitch(), self.tts.max_pitch());
            let _ = self.tts.set_pitch(pitch);
        }
        if self.features.volume {
            let volume = (self.tts.max_volume() * params.volume)
                .clamp(self.tts.min_volume(), self.tts.max_volume());
            let _ = self.tts.set_volume(volume);
        }
    }
}

fn lock<T>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use texttunes_core::UtteranceEvent;

    use super::*;

    #[test]
    fn late_stop_of_cancelled_utterance_leaves_successor_alone() {
        let mut tracker = Tracker::<u64>::default();
        let (first, mut first_rx) = UtteranceEvents::channel();
        let (second, mut second_rx) = UtteranceEvents::channel();

        tracker.begin(first);
        tracker.assign(Some(1));
        tracker.retire_current();

        tracker.begin(second);
        tracker.assign(Some(2));

        // The first utterance's stop arrives after the second was queued.
        assert!(tracker.settle(1).is_none());
        assert!(first_rx.try_recv().is_err());

        tracker.owner(2).unwrap().started();
        tracker.settle(2).unwrap().finished();
        assert_eq!(second_rx.try_recv().unwrap(), UtteranceEvent::Started);
        assert_eq!(second_rx.try_recv().unwrap(), UtteranceEvent::Finished);
        assert!(tracker.retired.is_empty());
    }

    #[test]
    fn callbacks_before_id_assignment_reach_current_utterance() {
        let mut tracker = Tracker::<u64>::default();
        let (events, mut rx) = UtteranceEvents::channel();

        tracker.begin(events);
        tracker.owner(7).unwrap().started();
        assert_eq!(rx.try_recv().unwrap(), UtteranceEvent::Started);

        tracker.assign(Some(7));
        assert!(tracker.owner(8).is_none());
        assert!(tracker.settle(7).is_some());
    }

    #[test]
    fn retired_ids_are_bounded() {
        let mut tracker = Tracker::<u64>::default();
        for id in 0..(RETIRED_CAP as u64 + 4) {
            let (events, _rx) = UtteranceEvents::channel();
            tracker.begin(events);
            tracker.assign(Some(id));
            tracker.retire_current();
        }
        assert_eq!(tracker.retired.len(), RETIRED_CAP);
        assert!(!tracker.retired.contains(&0));
    }
}
