//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options. The
//! settings flags double as environment variables (`TEXTTUNES_*`), which
//! `dotenvy` may populate from a `.env` file.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the texttunes speech toolkit.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "texttunes")]
#[command(about = "Turn text into speech with your system's voices")]
#[command(version)]
pub struct Cli {
    /// Voice identifier, e.g. en-GB-male (see `texttunes voices`)
    #[arg(long, global = true, env = "TEXTTUNES_VOICE")]
    pub voice: Option<String>,

    /// Maximum characters accepted per request
    #[arg(long = "max-chars", global = true, env = "TEXTTUNES_MAX_CHARS")]
    pub max_chars: Option<usize>,

    /// File name used when downloading the clip
    #[arg(long = "download-name", global = true, env = "TEXTTUNES_DOWNLOAD_NAME")]
    pub download_name: Option<String>,

    /// Playback volume between 0.0 and 1.0
    #[arg(long, global = true, env = "TEXTTUNES_VOLUME")]
    pub volume: Option<f32>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "texttunes",
            "--verbose",
            "--voice",
            "de-DE-male",
            "--volume",
            "0.5",
            "samples",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.voice.as_deref(), Some("de-DE-male"));
        assert_eq!(cli.volume, Some(0.5));
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["texttunes", "speak", "Hi", "--max-chars", "10"]);
        assert_eq!(cli.max_chars, Some(10));
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::parse_from(["texttunes"]);
        assert!(cli.command.is_none());
    }
}
