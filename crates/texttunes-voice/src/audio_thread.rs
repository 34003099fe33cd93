//! Dedicated media thread: isolates `!Send` audio resources from the async runtime.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Rather than using
//! `unsafe impl Send/Sync`, we confine it to a single OS thread and
//! communicate via channels.
//!
//! The public [`LocalMediaElement`] is the `Send` proxy the
//! [`AudioPlayer`](crate::player::AudioPlayer) drives. Every
//! [`MediaElement`] call becomes a [`MediaCommand`] sent to the actor thread,
//! which also ticks periodically to report progress and the end of the clip.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use texttunes_core::{MediaElement, MediaError, MediaEvents, ResourceLocator};

use crate::error::VoiceError;
use crate::playback::ClipPlayback;

/// How often the media thread reports playback progress.
const TICK: Duration = Duration::from_millis(250);

/// Progress tick schedule, kept independent of command traffic.
#[derive(Debug, Clone, Copy)]
struct TickClock {
    last: Instant,
}

impl TickClock {
    fn starting_at(now: Instant) -> Self {
        Self { last: now }
    }

    /// Time left before the next tick is due.
    fn remaining(&self, now: Instant) -> Duration {
        TICK.saturating_sub(now.saturating_duration_since(self.last))
    }

    /// Whether a tick is due; if so the schedule restarts from `now`.
    fn take_due(&mut self, now: Instant) -> bool {
        if self.remaining(now).is_zero() {
            self.last = now;
            true
        } else {
            false
        }
    }
}

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from the player to the media thread.
enum MediaCommand {
    /// Decode and load a clip (paused).
    Load {
        bytes: Vec<u8>,
        events: MediaEvents,
        reply: mpsc::Sender<Result<(), MediaError>>,
    },

    /// Drop the current clip (fire-and-forget).
    Unload,

    /// Start or resume playback.
    Play {
        reply: mpsc::Sender<Result<(), MediaError>>,
    },

    /// Pause playback (fire-and-forget).
    Pause,

    /// Move the playback cursor.
    Seek {
        position: f64,
        reply: mpsc::Sender<Result<(), MediaError>>,
    },

    /// Set output volume (fire-and-forget).
    SetVolume(f32),

    /// Shut down the media thread, releasing the output device.
    Shutdown,
}

// ── Handle (Send proxy) ────────────────────────────────────────────

/// `Send` handle to the dedicated media thread.
///
/// Request–reply methods block the caller until the media thread responds;
/// this latency is negligible (local channel I/O plus the audio operation).
pub struct LocalMediaElement {
    cmd_tx: mpsc::Sender<MediaCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl LocalMediaElement {
    /// Spawn the media thread, open the default output device, and return
    /// the handle.
    ///
    /// Errors from opening the device are propagated back to the caller via
    /// a one-shot init channel.
    pub fn spawn() -> Result<Self, VoiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<MediaCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), MediaError>>();

        let thread = thread::Builder::new()
            .name("texttunes-media".into())
            .spawn(move || {
                Self::run(&cmd_rx, &init_tx);
            })
            .map_err(|e| {
                VoiceError::Media(MediaError::Output(format!(
                    "failed to spawn media thread: {e}"
                )))
            })?;

        // Wait for the media thread to finish initialisation.
        init_rx.recv().map_err(|_| VoiceError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// Send a command that expects a `Result<(), MediaError>` reply and
    /// block until the media thread responds.
    fn send_and_recv(
        &self,
        build: impl FnOnce(mpsc::Sender<Result<(), MediaError>>) -> MediaCommand,
    ) -> Result<(), MediaError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx.send(build(tx)).map_err(|_| thread_died())?;
        rx.recv().map_err(|_| thread_died())?
    }

    /// Fire-and-forget command.
    fn send(&self, cmd: MediaCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!("Media thread is gone, command dropped");
        }
    }

    // ── Media thread event loop ────────────────────────────────────

    /// The body of the dedicated media thread. Owns `ClipPlayback` for its
    /// entire lifetime; it never crosses thread boundaries.
    fn run(cmd_rx: &mpsc::Receiver<MediaCommand>, init_tx: &mpsc::Sender<Result<(), MediaError>>) {
        let mut playback = match ClipPlayback::new() {
            Ok(p) => p,
            Err(e) => {
                let _ = init_tx.send(Err(e));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            return;
        }

        let mut clock = TickClock::starting_at(Instant::now());
        loop {
            let cmd = match cmd_rx.recv_timeout(clock.remaining(Instant::now())) {
                Ok(cmd) => Some(cmd),
                Err(mpsc::RecvTimeoutError::Timeout) => None,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            };

            // Ticks run on schedule even under a steady stream of commands.
            if clock.take_due(Instant::now()) {
                playback.tick();
            }
            let Some(cmd) = cmd else {
                continue;
            };

            match cmd {
                MediaCommand::Load {
                    bytes,
                    events,
                    reply,
                } => {
                    let _ = reply.send(playback.load(bytes, events));
                }
                MediaCommand::Unload => playback.unload(),
                MediaCommand::Play { reply } => {
                    let _ = reply.send(playback.play());
                }
                MediaCommand::Pause => playback.pause(),
                MediaCommand::Seek { position, reply } => {
                    let _ = reply.send(playback.seek(position));
                }
                MediaCommand::SetVolume(volume) => playback.set_volume(volume),
                MediaCommand::Shutdown => break,
            }
        }

        // `playback` is dropped here, on the media thread.
        tracing::debug!("Media thread shutting down");
    }
}

impl MediaElement for LocalMediaElement {
    fn load(&mut self, source: &ResourceLocator, events: MediaEvents) -> Result<(), MediaError> {
        // File reads happen on the caller's thread; the media thread only decodes.
        let bytes = source.read_bytes_blocking()?;
        self.send_and_recv(|reply| MediaCommand::Load {
            bytes,
            events,
            reply,
        })
    }

    fn unload(&mut self) {
        self.send(MediaCommand::Unload);
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.send_and_recv(|reply| MediaCommand::Play { reply })
    }

    fn pause(&mut self) {
        self.send(MediaCommand::Pause);
    }

    fn seek(&mut self, position: f64) -> Result<(), MediaError> {
        self.send_and_recv(|reply| MediaCommand::Seek { position, reply })
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(MediaCommand::SetVolume(volume));
    }
}

impl Drop for LocalMediaElement {
    fn drop(&mut self) {
        // Best-effort shutdown; the thread may already be dead.
        let _ = self.cmd_tx.send(MediaCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

fn thread_died() -> MediaError {
    MediaError::Output(VoiceError::AudioThreadDied.to_string())
}
