//! Clip playback via `rodio`: the state behind the local media element.
//!
//! Lives entirely on the media thread (see [`crate::audio_thread`]): the
//! `rodio::OutputStream` it owns is `!Send` on some platforms.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use texttunes_core::{MediaError, MediaEvent, MediaEvents};

/// A decoded clip loaded into its own sink.
struct LoadedClip {
    /// Encoded bytes, kept so the clip can be replayed after it ends.
    bytes: Arc<[u8]>,

    sink: Sink,

    /// Notification channel of the load that produced this clip.
    events: MediaEvents,

    /// Duration in seconds (0 if the container does not say).
    duration: f64,

    /// Whether we told the element's listener that playback is running.
    playing: bool,

    /// The sink drained; the next play restarts from the beginning.
    ended: bool,
}

/// Output device plus the currently loaded clip.
pub struct ClipPlayback {
    /// rodio output stream (must be kept alive).
    _stream: OutputStream,

    /// Handle used to create sinks.
    stream_handle: OutputStreamHandle,

    clip: Option<LoadedClip>,

    /// Volume applied to every new sink.
    volume: f32,
}

impl ClipPlayback {
    /// Open the default output device.
    pub fn new() -> Result<Self, MediaError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| MediaError::Output(e.to_string()))?;

        tracing::info!("Audio playback initialized on default output device");

        Ok(Self {
            _stream: stream,
            stream_handle,
            clip: None,
            volume: 1.0,
        })
    }

    /// Decode `bytes` into a fresh paused sink, replacing any previous clip.
    pub fn load(&mut self, bytes: Vec<u8>, events: MediaEvents) -> Result<(), MediaError> {
        self.unload();

        let bytes: Arc<[u8]> = Arc::from(bytes);
        let decoder = decode(&bytes)?;
        let duration = decoder
            .total_duration()
            .map_or(0.0, |d| d.as_secs_f64());

        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| MediaError::Output(e.to_string()))?;
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(decoder);

        events.emit(MediaEvent::LoadedMetadata { duration });
        tracing::debug!(duration, bytes = bytes.len(), "Clip loaded");

        self.clip = Some(LoadedClip {
            bytes,
            sink,
            events,
            duration,
            playing: false,
            ended: false,
        });
        Ok(())
    }

    /// Stop output and forget the clip.
    pub fn unload(&mut self) {
        if let Some(clip) = self.clip.take() {
            clip.sink.stop();
            tracing::debug!("Clip unloaded");
        }
    }

    pub fn play(&mut self) -> Result<(), MediaError> {
        self.loaded()?.play()
    }

    pub fn pause(&mut self) {
        if let Some(clip) = self.clip.as_mut() {
            clip.pause();
        }
    }

    pub fn seek(&mut self, position: f64) -> Result<(), MediaError> {
        self.loaded()?.seek(position)
    }

    /// Set playback volume (0.0 = muted, 1.0 = full).
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(clip) = &self.clip {
            clip.sink.set_volume(self.volume);
        }
    }

    /// Report progress; detects the end of the clip.
    ///
    /// Called periodically by the media thread.
    pub fn tick(&mut self) {
        if let Some(clip) = self.clip.as_mut() {
            clip.tick();
        }
    }

    fn loaded(&mut self) -> Result<&mut LoadedClip, MediaError> {
        self.clip
            .as_mut()
            .ok_or_else(|| MediaError::Unsupported("no clip loaded".to_string()))
    }
}

// ── Loaded clip ────────────────────────────────────────────────────

impl LoadedClip {
    fn play(&mut self) -> Result<(), MediaError> {
        self.rewind_if_drained()?;
        self.sink.play();
        self.playing = true;
        self.events.emit(MediaEvent::Playing);
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
        self.playing = false;
        self.events.emit(MediaEvent::Paused);
    }

    fn seek(&mut self, position: f64) -> Result<(), MediaError> {
        self.rewind_if_drained()?;
        self.sink
            .try_seek(Duration::from_secs_f64(position.max(0.0)))
            .map_err(|e| MediaError::Output(e.to_string()))?;
        self.events.emit(MediaEvent::TimeUpdate { position });
        Ok(())
    }

    /// Queue the clip again once the sink ran dry. The sink's paused flag
    /// is left alone; only `play` starts output.
    fn rewind_if_drained(&mut self) -> Result<(), MediaError> {
        if self.ended || self.sink.empty() {
            self.sink.append(decode(&self.bytes)?);
            self.ended = false;
        }
        Ok(())
    }

    fn tick(&mut self) {
        if !self.playing {
            return;
        }

        if self.sink.empty() {
            // Hold the sink paused so a later seek does not start output.
            self.sink.pause();
            self.playing = false;
            self.ended = true;
            self.events.emit(MediaEvent::TimeUpdate {
                position: self.duration,
            });
            self.events.emit(MediaEvent::Ended);
            tracing::debug!("Clip finished naturally");
        } else {
            self.events.emit(MediaEvent::TimeUpdate {
                position: self.sink.get_pos().as_secs_f64(),
            });
        }
    }
}

fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, MediaError> {
    Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| MediaError::Decode(e.to_string()))
}
