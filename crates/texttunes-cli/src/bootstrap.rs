//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - Settings (defaults, `.env`, environment, flags)
//! - The OS speech engine (feature `system-tts`)
//! - The local media element (feature `audio`)
//!
//! Command handlers receive the composed [`CliContext`].

use std::sync::Arc;

use texttunes_core::{
    MediaElement, MediaError, MediaEvents, ResourceLocator, SAMPLE_TEXTS, Settings, SettingsUpdate,
    SpeechEngine, SpeechRequest, validate_settings,
};
use texttunes_voice::{AudioPlayer, DispatchEvent, SpeechDispatcher};
use tokio::sync::mpsc;

use crate::commands::TextInput;
use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Validated settings.
    pub settings: Settings,
}

impl CliConfig {
    /// Layer the global flags (and their environment variables) over the
    /// defaults and validate the result.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut settings = Settings::with_defaults();
        settings.merge(&SettingsUpdate {
            default_voice: cli.voice.clone().map(Some),
            max_text_chars: cli.max_chars.map(Some),
            download_file_name: cli.download_name.clone().map(Some),
            initial_volume: cli.volume.map(Some),
        });
        validate_settings(&settings)?;
        Ok(Self { settings })
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Effective settings.
    pub settings: Settings,
    /// Speech dispatcher (reports `CapabilityUnavailable` without an engine).
    pub dispatcher: Arc<SpeechDispatcher>,
    /// Dispatch lifecycle events, consumed by the speaking handlers.
    pub dispatch_events: mpsc::UnboundedReceiver<DispatchEvent>,
}

impl CliContext {
    /// Access the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Access the speech dispatcher.
    pub fn dispatcher(&self) -> &Arc<SpeechDispatcher> {
        &self.dispatcher
    }

    /// Validate `input` into a request for the configured voice.
    pub fn request(&self, input: &TextInput) -> Result<SpeechRequest, CliError> {
        let text = resolve_text(input)?;
        Ok(SpeechRequest::new(
            text,
            self.settings.effective_voice(),
            self.settings.effective_max_text_chars(),
        )?)
    }

    /// A player over the local audio device.
    pub fn audio_player(&self) -> Result<AudioPlayer, CliError> {
        Ok(AudioPlayer::new(audio_element()?, &self.settings))
    }

    /// A player whose element produces no sound, for downloads.
    pub fn offline_player(&self) -> AudioPlayer {
        AudioPlayer::new(Box::new(OfflineElement), &self.settings)
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Starts the OS speech engine when compiled in and available
/// 2. Wraps it in the speech dispatcher
pub fn bootstrap(config: CliConfig) -> CliContext {
    let (dispatcher, dispatch_events) = SpeechDispatcher::new(speech_engine());
    tracing::debug!(
        voice = %config.settings.effective_voice(),
        speech = dispatcher.is_available(),
        "CLI context ready"
    );

    CliContext {
        settings: config.settings,
        dispatcher: Arc::new(dispatcher),
        dispatch_events,
    }
}

/// Text from the positional argument or a numbered sample.
fn resolve_text(input: &TextInput) -> Result<String, CliError> {
    match (&input.text, input.sample) {
        (_, Some(n)) => SAMPLE_TEXTS
            .get(usize::from(n).saturating_sub(1))
            .map(|s| (*s).to_string())
            .ok_or_else(|| CliError::Arguments(format!("no sample text {n}"))),
        (Some(text), None) => Ok(text.clone()),
        (None, None) => Ok(String::new()),
    }
}

#[cfg(feature = "system-tts")]
fn speech_engine() -> Option<Arc<dyn SpeechEngine>> {
    match texttunes_voice::SystemSpeechEngine::spawn() {
        Ok(engine) => Some(Arc::new(engine)),
        Err(e) => {
            tracing::warn!(error = %e, "System speech engine unavailable");
            None
        }
    }
}

#[cfg(not(feature = "system-tts"))]
fn speech_engine() -> Option<Arc<dyn SpeechEngine>> {
    None
}

#[cfg(feature = "audio")]
fn audio_element() -> Result<Box<dyn MediaElement>, CliError> {
    Ok(Box::new(texttunes_voice::LocalMediaElement::spawn()?))
}

#[cfg(not(feature = "audio"))]
fn audio_element() -> Result<Box<dyn MediaElement>, CliError> {
    Err(CliError::Unavailable(
        "Audio output is not available (build with --features audio)".to_string(),
    ))
}

/// A media element with no output device: it accepts every resource and
/// reports it as zero-length.
struct OfflineElement;

impl MediaElement for OfflineElement {
    fn load(&mut self, _source: &ResourceLocator, events: MediaEvents) -> Result<(), MediaError> {
        events.emit(texttunes_core::MediaEvent::LoadedMetadata { duration: 0.0 });
        Ok(())
    }

    fn unload(&mut self) {}

    fn play(&mut self) -> Result<(), MediaError> {
        Err(MediaError::Output("no audio output".to_string()))
    }

    fn pause(&mut self) {}

    fn seek(&mut self, _position: f64) -> Result<(), MediaError> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn config(args: &[&str]) -> Result<CliConfig, CliError> {
        let mut argv = vec!["texttunes"];
        argv.extend_from_slice(args);
        argv.push("samples");
        CliConfig::from_cli(&Cli::parse_from(argv))
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = config(&["--voice", "it-IT-female", "--download-name", "clip.wav"]).unwrap();
        assert_eq!(config.settings.effective_voice().to_string(), "it-IT-female");
        assert_eq!(config.settings.effective_download_file_name(), "clip.wav");
    }

    #[test]
    fn test_invalid_settings_are_config_errors() {
        assert!(matches!(
            config(&["--volume", "2"]),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            config(&["--voice", "robot"]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_sample_text_is_resolved() {
        let input = TextInput {
            text: None,
            sample: Some(1),
        };
        assert_eq!(resolve_text(&input).unwrap(), SAMPLE_TEXTS[0]);
    }

    #[test]
    fn test_missing_text_fails_validation() {
        let ctx = bootstrap(CliConfig {
            settings: Settings::with_defaults(),
        });
        let input = TextInput {
            text: None,
            sample: None,
        };
        assert!(matches!(ctx.request(&input), Err(CliError::Validation(_))));
    }

    #[test]
    fn test_max_chars_setting_is_enforced() {
        let mut settings = Settings::with_defaults();
        settings.max_text_chars = Some(5);
        let ctx = bootstrap(CliConfig { settings });
        let input = TextInput {
            text: Some("too long".to_string()),
            sample: None,
        };
        assert!(matches!(ctx.request(&input), Err(CliError::Validation(_))));
    }
}
