//! Verify command implementation.

use hav_core::{provider_for, HeuristicConfig, SignedArtifact, Verifier, VerifyOptions};
use std::path::Path;

use crate::output;
use crate::path;

pub struct VerifyArgs {
    pub artifact: String,
    pub log: Option<String>,
    pub json: bool,
    pub strict: bool,
    pub min_events: Option<usize>,
    pub min_interval_ms: Option<u64>,
    pub now: Option<u64>,
}

pub fn run(args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let artifact_path = path::validate_input_path(&args.artifact)
        .map_err(|e| format!("Invalid artifact path: {}", e))?;
    let artifact: SignedArtifact = serde_json::from_slice(&std::fs::read(&artifact_path)?)
        .map_err(|e| format!("Failed to read artifact: {}", e))?;

    let log_path = match args.log {
        Some(log) => Some(log),
        None => artifact.log_location.as_deref().and_then(|location| {
            let base = artifact_path.parent().unwrap_or(Path::new("."));
            path::local_log_location(location, base).map(|p| p.to_string_lossy().into_owned())
        }),
    };
    let log = match log_path {
        Some(p) => Some(super::load_log(&p)?.0),
        None => {
            tracing::warn!("no local log available, verifying content signature only");
            None
        }
    };

    let mut heuristics = HeuristicConfig::default();
    if let Some(min) = args.min_events {
        heuristics.min_events = min;
    }
    if let Some(min) = args.min_interval_ms {
        heuristics.min_mean_key_interval_ms = min;
    }
    let options = VerifyOptions {
        heuristics,
        now_ms: args.now,
    };

    let verifier = Verifier::with_options(provider_for(artifact.public_key.alg), options);
    let result = verifier.verify_artifact(&artifact, log.as_ref())?;

    if args.json {
        println!("{}", output::format_json(&result)?);
    } else {
        println!("{}", output::format_report(&result));
    }

    if args.strict && !result.is_valid {
        std::process::exit(1);
    }

    Ok(())
}
