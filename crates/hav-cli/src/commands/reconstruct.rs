//! Reconstruct command implementation.

pub fn run(log: String) -> Result<(), Box<dyn std::error::Error>> {
    let (log, _) = super::load_log(&log)?;
    println!("{}", hav_core::reconstruct(&log));
    Ok(())
}
