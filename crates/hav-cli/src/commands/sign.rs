//! Sign command implementation.

use hav_core::{provider_for, reconstruct, KeyPair, Signer};

use crate::path;

pub struct SignArgs {
    pub key: String,
    pub log: String,
    pub text: Option<String>,
    pub timestamp: Option<u64>,
    pub log_location: Option<String>,
    pub fingerprint: bool,
    pub out: Option<String>,
}

pub fn run(args: SignArgs) -> Result<(), Box<dyn std::error::Error>> {
    let key_path =
        path::validate_input_path(&args.key).map_err(|e| format!("Invalid key path: {}", e))?;
    let pair: KeyPair = serde_json::from_slice(&std::fs::read(&key_path)?)
        .map_err(|e| format!("Failed to read key pair: {}", e))?;

    let (log, _) = super::load_log(&args.log)?;
    let text = args.text.unwrap_or_else(|| reconstruct(&log));

    let signer = Signer::new(provider_for(pair.private_key.alg));
    let output = match args.timestamp {
        Some(ts) => signer.sign_at(&log, &text, ts, &pair.private_key)?,
        None => signer.sign(&log, &text, &pair.private_key)?,
    };

    let mut artifact = output.into_artifact(text, pair.public_key);
    if let Some(location) = args.log_location {
        artifact = artifact.with_log_location(location);
    }
    if args.fingerprint {
        artifact = artifact.with_fingerprint_of(&log)?;
    }

    super::emit(args.out.as_deref(), &serde_json::to_string_pretty(&artifact)?)
}
