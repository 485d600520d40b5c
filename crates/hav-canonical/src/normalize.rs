//! Whitespace normalization for text comparison.

/// Collapses every run of whitespace (spaces, tabs, newlines, Unicode
/// spaces) into a single ASCII space and trims both ends.
///
/// Displayed text scraped from markup rarely preserves the line breaks of the
/// editor it was typed into, so comparisons go through this form.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
