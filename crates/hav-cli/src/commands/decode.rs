//! Decode command implementation.

use hav_log::{LogDocument, LogReader, ReadMode};

use crate::path;

pub fn run(
    input: String,
    permissive: bool,
    timestamp: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input_path =
        path::validate_input_path(&input).map_err(|e| format!("Invalid log path: {}", e))?;
    let mode = if permissive {
        ReadMode::Permissive
    } else {
        ReadMode::Strict
    };

    let mut reader = LogReader::open(&input_path, mode).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&input_path);
        format!("Failed to open log file: {}: {}", sanitized, e)
    })?;
    let log = reader.read_all()?;

    let json = match timestamp {
        Some(timestamp) => serde_json::to_string_pretty(&LogDocument { log, timestamp })?,
        None => serde_json::to_string_pretty(&log)?,
    };
    println!("{}", json);
    Ok(())
}
