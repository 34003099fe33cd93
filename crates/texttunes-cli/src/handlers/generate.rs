//! Generate command handler.
//!
//! The full convert flow: validate, speak, then hand the resulting clip to
//! the player so it can be saved or replayed.

use std::path::PathBuf;

use anyhow::Result;
use texttunes_core::{DispatchOutcome, ResourceLocator};

use crate::bootstrap::CliContext;
use crate::commands::TextInput;
use crate::error::CliError;
use crate::handlers::{play, speak};

/// Arguments for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub input: TextInput,
    /// Directory to save the clip into.
    pub out: Option<PathBuf>,
    /// Play the clip once it is loaded.
    pub play: bool,
}

/// Execute the generate command.
///
/// The player shows a loading state while the engine speaks. On success the
/// built-in clip becomes the player's resource; on failure or Ctrl-C the
/// player is cleared and nothing is saved.
///
/// # Errors
///
/// Same as [`speak::execute`], plus download and playback failures.
pub async fn execute(ctx: &mut CliContext, args: GenerateArgs) -> Result<()> {
    let request = ctx.request(&args.input)?;
    let mut player = if args.play {
        ctx.audio_player()?
    } else {
        ctx.offline_player()
    };

    player.begin_loading();
    match speak::speak_until_interrupted(ctx, &request).await {
        Ok(DispatchOutcome::Completed) => {}
        Ok(DispatchOutcome::Cancelled) => {
            player.clear();
            println!("Speech stopped.");
            return Ok(());
        }
        Err(e) => {
            player.clear();
            return Err(e.into());
        }
    }

    player
        .set_source(Some(ResourceLocator::placeholder()))
        .map_err(CliError::from)?;
    println!("{}", speak::SUCCESS_MESSAGE);

    if let Some(dir) = &args.out {
        let path = player.download(dir).await.map_err(CliError::from)?;
        println!("Saved {}", path.display());
    }

    if args.play {
        play::run_to_end(&mut player).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use texttunes_core::Settings;

    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};

    #[tokio::test]
    async fn test_nothing_is_saved_without_speech() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = bootstrap(CliConfig {
            settings: Settings::with_defaults(),
        });
        let args = GenerateArgs {
            input: TextInput {
                text: None,
                sample: Some(2),
            },
            out: Some(dir.path().to_path_buf()),
            play: false,
        };

        let err = execute(&mut ctx, args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Unavailable(_))
        ));
        assert!(!dir.path().join("speech.wav").exists());
    }
}
