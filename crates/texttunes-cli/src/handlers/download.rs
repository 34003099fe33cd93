//! Download command handler.
//!
//! Saves a clip under the configured download file name. No audio device
//! is needed.

use std::path::Path;

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::parse_locator;

/// Execute the download command.
///
/// # Errors
///
/// Fails when the locator is invalid or unreadable, or the target cannot
/// be written.
pub async fn execute(ctx: &CliContext, locator: Option<&str>, dir: &Path) -> Result<()> {
    let mut player = ctx.offline_player();
    player
        .set_source(Some(parse_locator(locator)?))
        .map_err(CliError::from)?;

    let path = player.download(dir).await.map_err(CliError::from)?;
    println!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use texttunes_core::Settings;

    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};

    fn context(settings: Settings) -> CliContext {
        bootstrap(CliConfig { settings })
    }

    #[test]
    fn test_builtin_clip_is_saved_under_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(Settings::with_defaults());

        tokio_test::block_on(execute(&ctx, None, dir.path())).unwrap();

        let bytes = std::fs::read(dir.path().join("speech.wav")).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
    }

    #[test]
    fn test_file_clip_is_copied_under_configured_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("input.wav");
        std::fs::write(&source, b"RIFF----WAVE").unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let ctx = context(Settings {
            download_file_name: Some("clip.wav".to_string()),
            ..Settings::with_defaults()
        });
        let locator = source.to_string_lossy().into_owned();
        tokio_test::block_on(execute(&ctx, Some(&locator), &out)).unwrap();

        assert_eq!(std::fs::read(out.join("clip.wav")).unwrap(), b"RIFF----WAVE");
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(Settings::with_defaults());
        let missing = dir.path().join("gone.wav").to_string_lossy().into_owned();

        let err = tokio_test::block_on(execute(&ctx, Some(&missing), dir.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Io(_))
        ));
    }
}
