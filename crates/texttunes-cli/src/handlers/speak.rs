//! Speak command handler.
//!
//! Speaks text through the platform engine with the configured voice.
//! Ctrl-C stops the utterance.

use std::sync::Arc;

use anyhow::Result;
use texttunes_core::{DispatchOutcome, SpeechRequest, find_voice};
use texttunes_voice::DispatchEvent;

use crate::bootstrap::CliContext;
use crate::commands::TextInput;
use crate::error::CliError;

/// Message shown once speech completes.
pub const SUCCESS_MESSAGE: &str = "Your text has been converted to speech.";

/// Execute the speak command.
///
/// # Errors
///
/// Returns a [`CliError`] when the text is rejected, no speech engine is
/// available, or the engine reports a failure.
pub async fn execute(ctx: &mut CliContext, input: &TextInput) -> Result<()> {
    let request = ctx.request(input)?;

    match speak_until_interrupted(ctx, &request).await? {
        DispatchOutcome::Completed => println!("{SUCCESS_MESSAGE}"),
        DispatchOutcome::Cancelled => println!("Speech stopped."),
    }
    Ok(())
}

/// Speak `request`, reporting progress, until it ends or Ctrl-C stops it.
pub(crate) async fn speak_until_interrupted(
    ctx: &mut CliContext,
    request: &SpeechRequest,
) -> Result<DispatchOutcome, CliError> {
    let dispatcher = Arc::clone(ctx.dispatcher());
    let events = &mut ctx.dispatch_events;

    let speaking = dispatcher.speak(request);
    tokio::pin!(speaking);

    loop {
        tokio::select! {
            outcome = &mut speaking => return Ok(outcome?),

            Some(event) = events.recv() => {
                if let DispatchEvent::Started(_) = event {
                    println!("Speaking with {}...", voice_label(request));
                }
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted, stopping speech");
                dispatcher.stop();
            }
        }
    }
}

/// Display name of the requested catalog voice.
fn voice_label(request: &SpeechRequest) -> String {
    match find_voice(request.voice()) {
        Some(voice) => format!("{} ({})", voice.name, voice.language),
        None => request.voice().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use texttunes_core::{Settings, VoiceId};

    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};

    fn context() -> CliContext {
        bootstrap(CliConfig {
            settings: Settings::with_defaults(),
        })
    }

    #[test]
    fn test_voice_label_uses_catalog_name() {
        let request =
            SpeechRequest::new("Hi", VoiceId::parse("fr-FR-female").unwrap(), 10).unwrap();
        assert_eq!(voice_label(&request), "Camille (French)");
    }

    #[test]
    fn test_empty_text_is_rejected_before_speaking() {
        let mut ctx = context();
        let input = TextInput {
            text: Some("   ".to_string()),
            sample: None,
        };

        let err = tokio_test::block_on(execute(&mut ctx, &input)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Validation(_))
        ));
        assert!(!ctx.dispatcher().is_speaking());
    }

    #[tokio::test]
    async fn test_missing_engine_is_unavailable() {
        let mut ctx = context();
        let input = TextInput {
            text: Some("Hello there".to_string()),
            sample: None,
        };

        let err = execute(&mut ctx, &input).await.unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli, CliError::Unavailable(_)));
        assert_eq!(cli.exit_code(), 69);
    }
}
