//! Media element port: an audio output that plays a resource locator.
//!
//! Modeled on an HTML media element: imperative transport calls plus a
//! stream of notifications. Callers treat the notifications, not the calls,
//! as the source of truth for play/pause state.

use tokio::sync::mpsc;

use crate::domain::ResourceLocator;
use crate::error::MediaError;

/// Notifications fired by a media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Metadata is known; `duration` in seconds.
    LoadedMetadata { duration: f64 },
    /// Playback position moved; `position` in seconds.
    TimeUpdate { position: f64 },
    /// Playback actually started.
    Playing,
    /// Playback actually paused.
    Paused,
    /// Playback reached the end of the resource.
    Ended,
    /// The element failed while loading or playing.
    Error(String),
}

/// Sending half of a media element's notification channel.
#[derive(Debug, Clone)]
pub struct MediaEvents {
    tx: mpsc::UnboundedSender<MediaEvent>,
}

impl MediaEvents {
    /// Create a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MediaEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Fire a notification. Dropped silently if nobody listens any more.
    pub fn emit(&self, event: MediaEvent) {
        let _ = self.tx.send(event);
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// An audio element the playback controller drives.
///
/// `play`/`pause` only *request* a transition; the element confirms with
/// [`MediaEvent::Playing`] / [`MediaEvent::Paused`] on the channel handed to
/// [`load`](MediaElement::load).
pub trait MediaElement: Send {
    /// Replace the current resource. Notifications for it go to `events`.
    fn load(&mut self, source: &ResourceLocator, events: MediaEvents) -> Result<(), MediaError>;

    /// Drop the current resource and stop output.
    fn unload(&mut self);

    /// Request playback.
    fn play(&mut self) -> Result<(), MediaError>;

    /// Request pause.
    fn pause(&mut self);

    /// Move the playback cursor to `position` seconds.
    fn seek(&mut self, position: f64) -> Result<(), MediaError>;

    /// Set output volume (0.0–1.0).
    fn set_volume(&mut self, volume: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_after_receiver_drop_is_silent() {
        let (events, rx) = MediaEvents::channel();
        drop(rx);
        assert!(events.is_closed());
        events.emit(MediaEvent::Ended);
    }

    #[test]
    fn emitted_events_are_received() {
        let (events, mut rx) = MediaEvents::channel();
        events.emit(MediaEvent::LoadedMetadata { duration: 2.5 });
        events.emit(MediaEvent::Playing);

        assert_eq!(rx.try_recv().unwrap(), MediaEvent::LoadedMetadata { duration: 2.5 });
        assert_eq!(rx.try_recv().unwrap(), MediaEvent::Playing);
    }
}
