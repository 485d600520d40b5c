//! Output formatting utilities.

use hav_core::VerificationResult;

/// Formats a verification result as pretty JSON.
pub fn format_json(result: &VerificationResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Formats a verification result as a human-readable report.
pub fn format_report(result: &VerificationResult) -> String {
    let mut lines = vec![
        format!("{:<16} {}", "LEVEL 1", verdict(result.level1_valid)),
        format!("{:<16} {}", "LEVEL 2", verdict(result.level2_valid)),
        format!("{:<16} {}", "OVERALL", verdict(result.is_valid)),
        "-".repeat(40),
    ];
    if !result.reconstructed_text.is_empty() {
        lines.push(format!(
            "{:<16} {}",
            "RECONSTRUCTED",
            truncate(&result.reconstructed_text, 60)
        ));
    }
    for error in &result.errors {
        lines.push(format!("{:<16} {}", "ERROR", error));
    }
    for warning in &result.warnings {
        lines.push(format!("{:<16} {}", "WARNING", warning));
    }
    lines.join("\n")
}

fn verdict(valid: bool) -> &'static str {
    if valid {
        "valid"
    } else {
        "INVALID"
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
