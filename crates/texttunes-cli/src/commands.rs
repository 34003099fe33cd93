//! Main commands enum and primary subcommands.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available commands for the texttunes speech toolkit.
#[derive(Subcommand)]
pub enum Commands {
    /// List the selectable voices
    Voices {
        /// List voices installed on this machine instead
        #[arg(long)]
        platform: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the quick sample texts
    Samples,

    /// Speak text aloud with the selected voice
    Speak {
        #[command(flatten)]
        input: TextInput,
    },

    /// Speak text, then load the resulting clip into the player
    Generate {
        #[command(flatten)]
        input: TextInput,
        /// Save the clip into this directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Play the clip after generating it
        #[arg(long)]
        play: bool,
    },

    /// Play an audio clip (defaults to the built-in clip)
    Play {
        /// data: URL, file:// URL or path
        locator: Option<String>,
        /// Start position in seconds
        #[arg(long)]
        seek: Option<f64>,
    },

    /// Save an audio clip under the download file name
    Download {
        /// data: URL, file:// URL or path
        locator: Option<String>,
        /// Target directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Render seconds as m:ss
    FormatTime {
        /// Values in seconds
        #[arg(required = true, allow_negative_numbers = true)]
        seconds: Vec<f64>,
    },
}

/// Where the text to speak comes from.
#[derive(Args, Debug, Clone)]
pub struct TextInput {
    /// Text to convert
    #[arg(conflicts_with = "sample")]
    pub text: Option<String>,

    /// Use quick sample text N (1-3)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub sample: Option<u8>,
}
