//! Output formatting utilities.

use gkpo_canonical::ReducibilityReason;
use serde_json::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats reasons as `[a, b]`.
pub fn format_reasons(reasons: &[ReducibilityReason]) -> String {
    let tags: Vec<&str> = reasons.iter().map(|r| r.as_str()).collect();
    format!("[{}]", tags.join(", "))
}

/// Compact JSON for one side of a diff, `<MISSING>` when absent.
pub fn format_diff_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => truncate(&v.to_string(), 120),
        None => "<MISSING>".to_string(),
    }
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<66} {:<9} {}", "OPAL_HASH", "VERDICT", "PATH");
    println!("{}", "-".repeat(100));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
