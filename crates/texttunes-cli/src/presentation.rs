//! Shared CLI presentation utilities.
//!
//! Format-only helpers for consistent terminal output across commands.

use texttunes_voice::format_time;

/// Truncates a string to at most `max_len` characters, adding "..." if
/// anything was cut.
///
/// # Examples
///
/// ```rust
/// use texttunes_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// `elapsed / total` as shown under the player's progress bar.
pub fn progress_line(position: f64, duration: f64) -> String {
    format!("{} / {}", format_time(position), format_time(duration))
}
