//! Keygen command implementation.

use hav_core::{provider_named, KeyPairProvider};

pub fn run(alg: String, out: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let provider = provider_named(&alg)?;
    let pair = provider.generate_keypair()?;
    tracing::info!(alg = %pair.public_key.alg, "generated key pair");

    super::emit(out.as_deref(), &serde_json::to_string_pretty(&pair)?)?;
    if out.is_some() {
        // Key pair went to disk; print the shareable half.
        println!("{}", pair.public_key.to_blob()?);
    }
    Ok(())
}
