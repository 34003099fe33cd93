//! Play command handler.
//!
//! Loads a clip into the local player and plays it to the end, printing
//! the elapsed time. Ctrl-C stops playback.

use std::io::Write;

use anyhow::Result;
use texttunes_core::MediaEvent;
use texttunes_voice::AudioPlayer;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::parse_locator;
use crate::presentation::progress_line;

/// Execute the play command.
///
/// # Errors
///
/// Fails when the locator is invalid, audio output is unavailable, or the
/// clip cannot be decoded.
pub async fn execute(ctx: &CliContext, locator: Option<&str>, seek: Option<f64>) -> Result<()> {
    let source = parse_locator(locator)?;
    let mut player = ctx.audio_player()?;

    player.set_source(Some(source)).map_err(CliError::from)?;
    player.sync();
    if let Some(position) = seek {
        player.seek(position).map_err(CliError::from)?;
    }

    run_to_end(&mut player).await?;
    Ok(())
}

/// Start playback and follow the element's notifications until the clip
/// ends, the element fails, or Ctrl-C.
pub(crate) async fn run_to_end(player: &mut AudioPlayer) -> Result<(), CliError> {
    player.sync();
    player.toggle()?;

    loop {
        tokio::select! {
            event = player.next_event() => match event {
                Some(MediaEvent::TimeUpdate { .. } | MediaEvent::Playing) => {
                    print!("\r{}", progress_line(player.position(), player.duration()));
                    let _ = std::io::stdout().flush();
                }
                Some(MediaEvent::Ended) => {
                    println!("\r{}", progress_line(player.duration(), player.duration()));
                    return Ok(());
                }
                Some(MediaEvent::Error(message)) => {
                    println!();
                    return Err(CliError::Playback(message));
                }
                Some(_) => {}
                None => return Ok(()),
            },

            _ = tokio::signal::ctrl_c() => {
                println!();
                tracing::debug!("Interrupted, stopping playback");
                player.clear();
                return Ok(());
            }
        }
    }
}
