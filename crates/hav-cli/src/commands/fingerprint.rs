//! Fingerprint command implementation.

pub fn run(log: String) -> Result<(), Box<dyn std::error::Error>> {
    let (log, _) = super::load_log(&log)?;
    let digest = hav_core::log_fingerprint(&log)?;
    println!("{}", digest.b64);
    Ok(())
}
