//! Samples command handler.
//!
//! Lists the quick sample texts that `--sample N` selects.

use anyhow::Result;
use texttunes_core::SAMPLE_TEXTS;

use crate::presentation::truncate_string;

/// Execute the samples command.
pub fn execute() -> Result<()> {
    for line in render(60) {
        println!("{line}");
    }
    println!();
    println!("Use 'texttunes speak --sample N' to speak one.");
    Ok(())
}

/// One numbered line per sample, truncated to `width` characters.
fn render(width: usize) -> Vec<String> {
    SAMPLE_TEXTS
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, truncate_string(text, width)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_numbered_from_one() {
        let lines = render(200);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "2. The quick brown fox jumps over the lazy dog."
        );
    }

    #[test]
    fn test_long_samples_are_truncated() {
        assert!(render(20)[0].ends_with("..."));
    }
}
