//! Hand-written fakes for the core ports.
//!
//! No speech synthesizer or audio device is touched: the fake engine hands
//! every utterance (and its event sender) back to the test, which then plays
//! the platform's role.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use texttunes_core::{
    MediaElement, MediaError, MediaEvents, PlatformVoice, ResourceLocator, SpeechEngine,
    SpeechError, Utterance, UtteranceEvents,
};
use tokio::sync::{mpsc, watch};

// ── Speech engine ──────────────────────────────────────────────────

/// An utterance handed to the fake engine, plus the sender the test uses
/// to fire its lifecycle callbacks.
pub type Spoken = (Utterance, UtteranceEvents);

pub struct FakeEngine {
    voices: Mutex<Vec<PlatformVoice>>,
    catalog: watch::Sender<u64>,
    spoken: mpsc::UnboundedSender<Spoken>,
    cancels: AtomicUsize,
    reject: AtomicBool,
}

impl FakeEngine {
    pub fn new(voices: Vec<PlatformVoice>) -> (Arc<Self>, mpsc::UnboundedReceiver<Spoken>) {
        let (spoken, rx) = mpsc::unbounded_channel();
        let (catalog, _) = watch::channel(0);
        let engine = Arc::new(Self {
            voices: Mutex::new(voices),
            catalog,
            spoken,
            cancels: AtomicUsize::new(0),
            reject: AtomicBool::new(false),
        });
        (engine, rx)
    }

    /// Replace the catalog and notify subscribers.
    pub fn populate(&self, voices: Vec<PlatformVoice>) {
        *self.voices.lock().unwrap() = voices;
        self.catalog.send_modify(|generation| *generation += 1);
    }

    /// Make subsequent `speak` calls fail without queueing anything.
    pub fn reject_speech(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl SpeechEngine for FakeEngine {
    fn voices(&self) -> Vec<PlatformVoice> {
        self.voices.lock().unwrap().clone()
    }

    fn subscribe_voices(&self) -> watch::Receiver<u64> {
        self.catalog.subscribe()
    }

    fn speak(&self, utterance: Utterance, events: UtteranceEvents) -> Result<(), SpeechError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(SpeechError::synthesis("synthesis-unavailable"));
        }
        self.spoken
            .send((utterance, events))
            .expect("test dropped the spoken receiver");
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Voices resembling a desktop install.
pub fn desktop_voices() -> Vec<PlatformVoice> {
    vec![
        PlatformVoice {
            is_default: true,
            ..PlatformVoice::new("Google US English", "en-US")
        },
        PlatformVoice::new("Microsoft David - English (United States)", "en-US"),
        PlatformVoice::new("Microsoft Zira - English (United States)", "en-US"),
        PlatformVoice::new("Sarah", "en-US"),
        PlatformVoice::new("Daniel", "en-GB"),
        PlatformVoice::new("Oliver", "en-GB"),
        PlatformVoice::new("Google UK English Female", "en-GB"),
        PlatformVoice::new("Anna", "de-DE"),
    ]
}

// ── Media element ──────────────────────────────────────────────────

/// Calls observed by [`FakeMediaElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementCall {
    Load(String),
    Unload,
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

/// Shared view of a [`FakeMediaElement`] the test keeps after the element
/// has been boxed into the player.
#[derive(Clone, Default)]
pub struct ElementProbe {
    calls: Arc<Mutex<Vec<ElementCall>>>,
    events: Arc<Mutex<Option<MediaEvents>>>,
}

impl ElementProbe {
    pub fn calls(&self) -> Vec<ElementCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The notification sender of the most recent load.
    pub fn events(&self) -> MediaEvents {
        self.events
            .lock()
            .unwrap()
            .clone()
            .expect("nothing loaded yet")
    }
}

/// A media element that records calls and never confirms anything on its
/// own; the test fires notifications through the probe.
pub struct FakeMediaElement {
    probe: ElementProbe,
    fail_load: bool,
}

impl FakeMediaElement {
    pub fn new() -> (Self, ElementProbe) {
        let probe = ElementProbe::default();
        (
            Self {
                probe: probe.clone(),
                fail_load: false,
            },
            probe,
        )
    }

    pub fn failing() -> (Self, ElementProbe) {
        let (mut element, probe) = Self::new();
        element.fail_load = true;
        (element, probe)
    }

    fn record(&self, call: ElementCall) {
        self.probe.calls.lock().unwrap().push(call);
    }
}

impl MediaElement for FakeMediaElement {
    fn load(&mut self, source: &ResourceLocator, events: MediaEvents) -> Result<(), MediaError> {
        self.record(ElementCall::Load(source.to_string()));
        if self.fail_load {
            return Err(MediaError::Decode("unsupported format".to_string()));
        }
        *self.probe.events.lock().unwrap() = Some(events);
        Ok(())
    }

    fn unload(&mut self) {
        self.record(ElementCall::Unload);
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.record(ElementCall::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.record(ElementCall::Pause);
    }

    fn seek(&mut self, position: f64) -> Result<(), MediaError> {
        self.record(ElementCall::Seek(position));
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(ElementCall::SetVolume(volume));
    }
}
