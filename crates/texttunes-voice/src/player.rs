//! Playback controller: transport controls over a [`MediaElement`].
//!
//! The controller never assumes a transport call succeeded: `toggle` only
//! *requests* play or pause, and the displayed state changes when the element
//! confirms with a [`MediaEvent`].
//!
//! ```text
//!   Empty ──begin_loading──▶ Loading ──set_source(Some)──▶ Paused ◀──Paused/Ended── Playing
//!     ▲                                                      │  └────────Playing──────▲
//!     └──────────────────────── clear / set_source(None) ◀───┘
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use texttunes_core::{MediaElement, MediaEvent, MediaEvents, ResourceLocator, Settings};

use crate::error::VoiceError;

// ── Player state ───────────────────────────────────────────────────

/// Coarse state of the playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PlayerState {
    /// No resource and nothing pending.
    #[default]
    Empty,

    /// A resource is being produced; transport controls are disabled.
    Loading,

    /// Resource loaded, not playing.
    Paused,

    /// Resource loaded and the element reports playback.
    Playing,
}

/// Serializable view of the controller for UI layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    /// Elapsed time in seconds.
    pub position: f64,
    /// Total duration in seconds (0 until metadata arrives).
    pub duration: f64,
    pub volume: f32,
    /// Display form of the current resource locator.
    pub source: Option<String>,
}

// ── Audio player ───────────────────────────────────────────────────

/// Transport controls plus live playback state.
pub struct AudioPlayer {
    /// The element that produces sound.
    element: Box<dyn MediaElement>,

    /// Currently loaded resource.
    source: Option<ResourceLocator>,

    state: PlayerState,
    position: f64,
    duration: f64,
    volume: f32,

    /// Notifications for the current resource only; replaced on every load.
    events: Option<mpsc::UnboundedReceiver<MediaEvent>>,

    /// File name used by [`download`](Self::download).
    download_file_name: String,
}

impl AudioPlayer {
    /// Create an empty player driving `element`, with initial volume and
    /// download file name taken from `settings`.
    pub fn new(element: Box<dyn MediaElement>, settings: &Settings) -> Self {
        Self {
            element,
            source: None,
            state: PlayerState::Empty,
            position: 0.0,
            duration: 0.0,
            volume: sanitize_volume(settings.effective_volume()),
            events: None,
            download_file_name: settings.effective_download_file_name().to_string(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────

    #[must_use]
    pub const fn state(&self) -> PlayerState {
        self.state
    }

    /// Elapsed time in seconds.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Total duration in seconds; 0 until metadata arrives.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub const fn source(&self) -> Option<&ResourceLocator> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    #[must_use]
    pub fn download_file_name(&self) -> &str {
        &self.download_file_name
    }

    /// Snapshot of the current state for display.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state,
            position: self.position,
            duration: self.duration,
            volume: self.volume,
            source: self.source.as_ref().map(ToString::to_string),
        }
    }

    // ── Source management ──────────────────────────────────────────

    /// Enter the loading state: the previous resource is released and
    /// transport controls are disabled until [`set_source`](Self::set_source).
    pub fn begin_loading(&mut self) {
        self.release();
        self.set_state(PlayerState::Loading);
    }

    /// Load `source` (ready, paused) or clear the player when `None`.
    pub fn set_source(&mut self, source: Option<ResourceLocator>) -> Result<(), VoiceError> {
        let Some(source) = source else {
            self.clear();
            return Ok(());
        };

        self.release();

        // A fresh channel per load: notifications from the previous resource
        // die with the old receiver.
        let (events, rx) = MediaEvents::channel();
        if let Err(e) = self.element.load(&source, events) {
            tracing::warn!(source = %source, error = %e, "Failed to load audio");
            self.set_state(PlayerState::Empty);
            return Err(e.into());
        }
        self.element.set_volume(self.volume);

        tracing::debug!(source = %source, "Audio loaded");
        self.events = Some(rx);
        self.source = Some(source);
        self.set_state(PlayerState::Paused);
        Ok(())
    }

    /// Drop the current resource.
    pub fn clear(&mut self) {
        self.release();
        self.set_state(PlayerState::Empty);
    }

    // ── Transport ──────────────────────────────────────────────────

    /// Request play when paused, pause when playing.
    ///
    /// The displayed state is left alone; it follows the element's
    /// `Playing` / `Paused` notifications.
    pub fn toggle(&mut self) -> Result<(), VoiceError> {
        match self.state {
            PlayerState::Playing => {
                self.element.pause();
                Ok(())
            }
            PlayerState::Paused => Ok(self.element.play()?),
            PlayerState::Empty | PlayerState::Loading => Err(VoiceError::NoResource),
        }
    }

    /// Move the cursor to `position` seconds, clamped to `[0, duration]`.
    ///
    /// Returns the position actually applied.
    pub fn seek(&mut self, position: f64) -> Result<f64, VoiceError> {
        if !position.is_finite() {
            return Err(VoiceError::InvalidSeek(position));
        }
        if self.source.is_none() {
            return Err(VoiceError::NoResource);
        }

        let target = position.clamp(0.0, self.duration.max(0.0));
        self.element.seek(target)?;
        self.position = target;
        tracing::trace!(requested = position, applied = target, "Seek");
        Ok(target)
    }

    /// Set the output volume, clamped to `[0.0, 1.0]`.
    ///
    /// Stored even with nothing loaded and applied on the next load.
    /// Returns the level actually applied.
    pub fn set_volume(&mut self, level: f32) -> Result<f32, VoiceError> {
        if !level.is_finite() {
            return Err(VoiceError::InvalidVolume(level));
        }

        self.volume = level.clamp(0.0, 1.0);
        if self.source.is_some() {
            self.element.set_volume(self.volume);
        }
        Ok(self.volume)
    }

    /// Write the current resource's bytes to `dir` under the configured
    /// download file name.
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<PathBuf, VoiceError> {
        let source = self.source.as_ref().ok_or(VoiceError::NoResource)?;
        let bytes = source.read_bytes().await?;

        let path = dir.as_ref().join(&self.download_file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| VoiceError::Download {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Audio downloaded");
        Ok(path)
    }

    // ── Notifications ──────────────────────────────────────────────

    /// Apply every notification already queued by the element.
    ///
    /// Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                pending.push(event);
            }
        }

        let count = pending.len();
        for event in pending {
            self.apply(event);
        }
        count
    }

    /// Wait for the next notification from the element and apply it.
    ///
    /// Returns `None` when nothing is loaded or the element has gone away.
    pub async fn next_event(&mut self) -> Option<MediaEvent> {
        let event = self.events.as_mut()?.recv().await?;
        self.apply(event.clone());
        Some(event)
    }

    /// Fold one element notification into the displayed state.
    pub fn apply(&mut self, event: MediaEvent) {
        if self.source.is_none() {
            tracing::trace!(?event, "Ignoring media event with nothing loaded");
            return;
        }

        match event {
            MediaEvent::LoadedMetadata { duration } => {
                if duration.is_finite() && duration >= 0.0 {
                    self.duration = duration;
                }
            }
            MediaEvent::TimeUpdate { position } => {
                if position.is_finite() {
                    self.position = position.max(0.0);
                }
            }
            MediaEvent::Playing => self.set_state(PlayerState::Playing),
            MediaEvent::Paused => self.set_state(PlayerState::Paused),
            MediaEvent::Ended => {
                self.position = self.duration;
                self.set_state(PlayerState::Paused);
            }
            MediaEvent::Error(message) => {
                tracing::warn!(%message, "Media element error");
                self.set_state(PlayerState::Paused);
            }
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Unload the element and forget everything about the old resource.
    fn release(&mut self) {
        if self.source.take().is_some() {
            self.element.unload();
        }
        self.events = None;
        self.position = 0.0;
        self.duration = 0.0;
    }

    fn set_state(&mut self, new_state: PlayerState) {
        if self.state != new_state {
            tracing::debug!(old = ?self.state, new = ?new_state, "Player state transition");
            self.state = new_state;
        }
    }
}

impl std::fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("state", &self.state)
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("volume", &self.volume)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

// ── Time formatting ────────────────────────────────────────────────

/// Render seconds as `m:ss`.
///
/// Non-finite or negative input renders `0:00`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
