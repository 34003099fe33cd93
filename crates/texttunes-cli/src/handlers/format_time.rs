//! Format-time command handler.

use anyhow::Result;
use texttunes_voice::format_time;

/// Execute the format-time command: one `m:ss` line per value.
pub fn execute(seconds: &[f64]) -> Result<()> {
    for value in seconds {
        println!("{}", format_time(*value));
    }
    Ok(())
}
