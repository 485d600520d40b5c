//! Encode command implementation.

use hav_log::{LogFormat, LogWriter, WriteOptions};

use crate::path;

pub fn run(input: String, out: String) -> Result<(), Box<dyn std::error::Error>> {
    let input_path =
        path::validate_input_path(&input).map_err(|e| format!("Invalid log path: {}", e))?;
    let bytes = std::fs::read(&input_path)?;
    if LogFormat::detect(&bytes) == LogFormat::Tlv {
        return Err("Input is already TLV".into());
    }
    let (log, _) = hav_log::parse_log(&bytes)?;

    let mut writer = LogWriter::open(
        &out,
        WriteOptions {
            append: false,
            ..WriteOptions::default()
        },
    )?;
    writer.append_log(&log)?;
    writer.finish()?;

    tracing::info!(events = log.len(), "wrote TLV log");
    Ok(())
}
