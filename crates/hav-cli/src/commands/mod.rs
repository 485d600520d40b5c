//! Subcommand implementations.

pub mod decode;
pub mod encode;
pub mod fingerprint;
pub mod keygen;
pub mod reconstruct;
pub mod sign;
pub mod verify;

use hav_log::{parse_log, Log};

use crate::path;

/// Loads a log in any supported format, with the timestamp of a JSON document.
pub(crate) fn load_log(path: &str) -> Result<(Log, Option<u64>), Box<dyn std::error::Error>> {
    let path = path::validate_input_path(path).map_err(|e| format!("Invalid log path: {}", e))?;
    let bytes = std::fs::read(&path)?;
    let parsed = parse_log(&bytes).map_err(|e| {
        format!(
            "Failed to parse log {}: {}",
            path::sanitize_path_for_error(&path),
            e
        )
    })?;
    tracing::debug!(events = parsed.0.len(), "loaded log");
    Ok(parsed)
}

/// Writes `contents` to `out`, or stdout when `out` is `None`.
pub(crate) fn emit(out: Option<&str>, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
    match out {
        Some(path) => std::fs::write(path, format!("{}\n", contents))?,
        None => println!("{}", contents),
    }
    Ok(())
}
