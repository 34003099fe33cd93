//! Voices command handler.
//!
//! Shows the selectable voice catalog, or with `--platform` the voices the
//! host synthesizer reports.

use anyhow::Result;
use texttunes_core::{PlatformVoice, VoiceDescriptor, VoiceId, voice_catalog};
use texttunes_voice::select_voice;

use crate::bootstrap::CliContext;
use crate::presentation::{print_separator, truncate_string};

/// Execute the voices command.
///
/// # Errors
///
/// Fails when `--platform` is given and no speech engine is available.
pub async fn execute(ctx: &CliContext, platform: bool, json: bool) -> Result<()> {
    let selected = ctx.settings().effective_voice();

    if !platform {
        let catalog = voice_catalog();
        if json {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        } else {
            for line in catalog_table(&catalog, &selected) {
                println!("{line}");
            }
        }
        return Ok(());
    }

    let voices = ctx.dispatcher().available_voices().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&voices)?);
        return Ok(());
    }

    if voices.is_empty() {
        println!("The speech engine reports no voices; the system default will be used.");
        return Ok(());
    }

    let lines = platform_table(&voices, &selected);
    println!("{}", lines[0]);
    print_separator(60);
    for line in &lines[1..] {
        println!("{line}");
    }
    Ok(())
}

/// Catalog rows, marking the configured voice with `*`.
fn catalog_table(catalog: &[VoiceDescriptor], selected: &VoiceId) -> Vec<String> {
    let mut lines = vec![format!(
        "  {:<14} {:<10} {:<14} Gender",
        "ID", "Name", "Language"
    )];
    for voice in catalog {
        let marker = if &voice.id == selected { '*' } else { ' ' };
        lines.push(format!(
            "{marker} {:<14} {:<10} {:<14} {}",
            voice.id.to_string(),
            voice.name,
            voice.language,
            voice.gender
        ));
    }
    lines
}

/// Platform voice rows, marking the one the configured voice resolves to.
fn platform_table(voices: &[PlatformVoice], selected: &VoiceId) -> Vec<String> {
    let chosen = select_voice(voices, selected).map(|v| v.id.clone());

    let mut lines = vec![format!("  {:<40} {:<8} Default", "Name", "Lang")];
    for voice in voices {
        let marker = if chosen.as_deref() == Some(voice.id.as_str()) {
            '*'
        } else {
            ' '
        };
        lines.push(format!(
            "{marker} {:<40} {:<8} {}",
            truncate_string(&voice.name, 40),
            voice.lang,
            if voice.is_default { "yes" } else { "" }
        ));
    }
    lines
}
