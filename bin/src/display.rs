//! Display utilities for the valet CLI.

use valet_lib::prelude::*;

/// Maps a `LOG_LEVEL` value to a filter directive.
pub(crate) fn log_level(level: &str) -> Option<&'static str> {
    match level.to_uppercase().as_str() {
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARN" => Some("warn"),
        "ERROR" => Some("error"),
        _ => None,
    }
}

/// Maps the `-v` count to a filter directive.
pub(crate) const fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Returns true if the detail's name or label contains the pattern (case-insensitive).
pub(crate) fn matches_search(detail: &Detail, pattern: &str) -> bool {
    let pattern = pattern.to_lowercase();
    detail.name.to_lowercase().contains(&pattern) || detail.label.to_lowercase().contains(&pattern)
}

/// Shortens text to `width` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Prints a name/label table of details.
pub(crate) fn print_details<'a>(details: impl IntoIterator<Item = &'a Detail>, noun: &str) {
    let details: Vec<_> = details.into_iter().collect();
    if details.is_empty() {
        println!("No {noun} found.");
        return;
    }

    println!("{:<30} {:<50}", "NAME", "LABEL");
    println!("{}", "-".repeat(80));
    for detail in &details {
        println!("{:<30} {:<50}", detail.name, truncate(&detail.label, 50));
    }
    println!("\nTotal: {} {noun}", details.len());
}
