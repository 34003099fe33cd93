//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Validate CLI-specific input
//!   2. Call the dispatcher or the player
//!   3. Format output for the terminal
//!
//! Handlers should NOT contain speech or playback logic; that lives in
//! `texttunes-voice`.

pub mod download;
pub mod format_time;
pub mod generate;
pub mod play;
pub mod samples;
pub mod speak;
pub mod voices;

use texttunes_core::ResourceLocator;

use crate::error::CliError;

/// The resource named on the command line, or the built-in clip.
pub(crate) fn parse_locator(raw: Option<&str>) -> Result<ResourceLocator, CliError> {
    match raw {
        Some(raw) => Ok(ResourceLocator::parse(raw)?),
        None => Ok(ResourceLocator::placeholder()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_locator_is_the_builtin_clip() {
        let locator = parse_locator(None).unwrap();
        assert_eq!(locator.mime(), Some("audio/wav"));
    }

    #[test]
    fn test_network_locator_is_rejected() {
        assert!(parse_locator(Some("https://example.com/a.wav")).is_err());
    }
}
