//! Level 1, Level 2 and two-tier verification.
//!
//! Level 1 checks the content signature over `{text, timestamp}` and needs no
//! log. Level 2 replays the log and checks, in order and stopping at the first
//! failure: normalized text equality, text digest equality, and the log
//! signature. Heuristics run only once Level 2 has passed.

use hav_canonical::{content_signing_input, log_signing_input, normalize_whitespace};
use hav_log::{signing_bytes, Log};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::artifact::{log_fingerprint, SignedArtifact};
use crate::crypto::CryptoProvider;
use crate::errors::CoreError;
use crate::heuristics::{check_security_features, HeuristicConfig};
use crate::keys::PublicKey;
use crate::reconstruct::reconstruct;
use crate::result::{ErrorKind, Level1Result, Level2Result, VerificationResult, Warning};
use crate::signature::SignatureBytes;
use crate::signing::now_millis;

/// Verifier configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Heuristic thresholds.
    pub heuristics: HeuristicConfig,
    /// Fixed "now" for the timestamp heuristic; the system clock when `None`.
    pub now_ms: Option<u64>,
}

/// Verifies artifacts through one composed provider.
///
/// A key whose algorithm differs from the provider's is a fatal
/// [`CryptoError::UnsupportedCapability`](crate::CryptoError::UnsupportedCapability).
#[derive(Debug, Clone)]
pub struct Verifier<P> {
    provider: P,
    options: VerifyOptions,
}

impl<P: CryptoProvider> Verifier<P> {
    /// Creates a verifier with default options.
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, VerifyOptions::default())
    }

    /// Creates a verifier with explicit options.
    pub fn with_options(provider: P, options: VerifyOptions) -> Self {
        Self { provider, options }
    }

    /// Active options.
    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Level 1: checks `content_signature` over `{text, timestamp}`.
    pub fn verify_content(
        &self,
        text: &str,
        content_signature: &SignatureBytes,
        timestamp: u64,
        public_key: &PublicKey,
    ) -> Result<Level1Result, CoreError> {
        let input = content_signing_input(text, timestamp);
        let valid = self.provider.verify(&input, content_signature, public_key)?;
        let errors = if valid {
            debug!(timestamp, "content signature verified");
            Vec::new()
        } else {
            warn!(timestamp, "content signature invalid");
            vec![ErrorKind::SignatureInvalid]
        };
        Ok(Level1Result { valid, errors })
    }

    /// Level 2: replays `log` and checks it against `text` and `log_signature`.
    pub fn verify_log_signature(
        &self,
        log: &Log,
        text: &str,
        log_signature: &SignatureBytes,
        timestamp: u64,
        public_key: &PublicKey,
    ) -> Result<Level2Result, CoreError> {
        let reconstructed_text = reconstruct(log);
        debug!(events = log.len(), "log replayed");

        let fail = |reconstructed_text: String, kind: ErrorKind| -> Result<Level2Result, CoreError> {
            warn!(error = %kind, "log verification failed");
            Ok(Level2Result {
                valid: false,
                reconstructed_text,
                errors: vec![kind],
                warnings: Vec::new(),
            })
        };

        if normalize_whitespace(text) != normalize_whitespace(&reconstructed_text) {
            return fail(reconstructed_text, ErrorKind::TextMismatch);
        }

        let expected_hash = self.provider.digest(text);
        if expected_hash != self.provider.digest(&reconstructed_text) {
            return fail(reconstructed_text, ErrorKind::HashMismatch);
        }

        let input = log_signing_input(&signing_bytes(log), &expected_hash, timestamp);
        if !self.provider.verify(&input, log_signature, public_key)? {
            return fail(reconstructed_text, ErrorKind::SignatureInvalid);
        }
        debug!(timestamp, "log signature verified");

        let now = self.options.now_ms.unwrap_or_else(now_millis);
        let warnings = check_security_features(log, timestamp, now, &self.options.heuristics);
        for warning in &warnings {
            debug!(%warning, "heuristic warning");
        }

        Ok(Level2Result {
            valid: true,
            reconstructed_text,
            errors: Vec::new(),
            warnings,
        })
    }

    /// Runs Level 1, then Level 2 only if Level 1 passed.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_two_tier(
        &self,
        text: &str,
        content_signature: &SignatureBytes,
        log_signature: &SignatureBytes,
        timestamp: u64,
        public_key: &PublicKey,
        log: &Log,
    ) -> Result<VerificationResult, CoreError> {
        let level1 = self.verify_content(text, content_signature, timestamp, public_key)?;
        if !level1.valid {
            return Ok(VerificationResult::level1_only(level1));
        }
        let level2 = self.verify_log_signature(log, text, log_signature, timestamp, public_key)?;
        Ok(VerificationResult::merge(level1, level2))
    }

    /// Verifies a published artifact.
    ///
    /// Without a log only Level 1 runs and the result carries
    /// [`ErrorKind::LogFetchFailure`]. When the artifact records a fingerprint
    /// that does not match `log`, a [`Warning::FingerprintMismatch`] is added;
    /// a log whose fingerprint cannot be computed (an event time above 2^53 - 1)
    /// gets [`Warning::FingerprintUnverifiable`].
    pub fn verify_artifact(
        &self,
        artifact: &SignedArtifact,
        log: Option<&Log>,
    ) -> Result<VerificationResult, CoreError> {
        let Some(log) = log else {
            let level1 = self.verify_content(
                &artifact.text,
                &artifact.content_signature,
                artifact.timestamp,
                &artifact.public_key,
            )?;
            let mut result = VerificationResult::level1_only(level1);
            warn!(location = ?artifact.log_location, "no log supplied, Level 2 skipped");
            result.errors.push(ErrorKind::LogFetchFailure);
            return Ok(result);
        };

        let mut result = self.verify_two_tier(
            &artifact.text,
            &artifact.content_signature,
            &artifact.log_signature,
            artifact.timestamp,
            &artifact.public_key,
            log,
        )?;

        if result.level1_valid {
            if let Some(claimed) = &artifact.fingerprint {
                match log_fingerprint(log) {
                    Ok(actual) if &actual == claimed => {}
                    Ok(_) => {
                        warn!(%claimed, "log fingerprint mismatch");
                        result.warnings.push(Warning::FingerprintMismatch);
                    }
                    Err(e) => {
                        warn!(%claimed, error = %e, "log fingerprint not computable");
                        result.warnings.push(Warning::FingerprintUnverifiable {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        Ok(result)
    }

    /// Verifies each artifact independently; one failure does not stop the rest.
    pub fn verify_batch<'a, I>(&self, items: I) -> Vec<Result<VerificationResult, CoreError>>
    where
        I: IntoIterator<Item = (&'a SignedArtifact, Option<&'a Log>)>,
    {
        items
            .into_iter()
            .map(|(artifact, log)| self.verify_artifact(artifact, log))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519Provider, KeyPairProvider};
    use crate::keys::KeyPair;
    use crate::signing::{SignOutput, Signer};
    use hav_log::Event;

    const T: u64 = 1_700_000_000_000;

    fn typed(text: &str) -> Log {
        let mut events = Vec::new();
        for (i, c) in text.chars().enumerate() {
            let time = T + 200 * i as u64;
            events.push(Event::KeyDown { key: c.to_string(), time });
            events.push(Event::Insert { ch: c.to_string(), cursor: i as u32, time: time + 1 });
            events.push(Event::KeyUp { key: c.to_string(), time: time + 100 });
        }
        Log::new(events)
    }

    fn setup(text: &str) -> (Verifier<Ed25519Provider>, KeyPair, Log, SignOutput) {
        let pair = Ed25519Provider.generate_keypair().unwrap();
        let log = typed(text);
        let out = Signer::new(Ed25519Provider)
            .sign_at(&log, text, T + 10_000, &pair.private_key)
            .unwrap();
        let options = VerifyOptions { now_ms: Some(T + 20_000), ..Default::default() };
        (Verifier::with_options(Ed25519Provider, options), pair, log, out)
    }

    #[test]
    fn level2_short_circuits_on_text_mismatch() {
        let (verifier, pair, log, out) = setup("Hi");
        let result = verifier
            .verify_log_signature(&log, "Ho", &out.log_signature, out.timestamp, &pair.public_key)
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.errors, vec![ErrorKind::TextMismatch]);
        assert_eq!(result.reconstructed_text, "Hi");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn level2_tolerates_whitespace_differences() {
        let (verifier, pair, log, out) = setup("Hi");
        let result = verifier
            .verify_log_signature(&log, "  Hi\n", &out.log_signature, out.timestamp, &pair.public_key)
            .unwrap();
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn internal_whitespace_difference_is_a_hash_mismatch() {
        let (verifier, pair, _, out) = setup("Hi");
        let log = typed("a  b");
        let result = verifier
            .verify_log_signature(&log, "a b", &out.log_signature, out.timestamp, &pair.public_key)
            .unwrap();
        assert_eq!(result.errors, vec![ErrorKind::HashMismatch]);
    }

    #[test]
    fn wrong_timestamp_fails_both_levels() {
        let (verifier, pair, log, out) = setup("Hi");
        let l1 = verifier
            .verify_content("Hi", &out.content_signature, out.timestamp + 1, &pair.public_key)
            .unwrap();
        assert_eq!(l1.errors, vec![ErrorKind::SignatureInvalid]);
        let l2 = verifier
            .verify_log_signature(&log, "Hi", &out.log_signature, out.timestamp + 1, &pair.public_key)
            .unwrap();
        assert_eq!(l2.errors, vec![ErrorKind::SignatureInvalid]);
    }

    #[test]
    fn level1_failure_skips_level2() {
        let (verifier, pair, log, out) = setup("Hi");
        let result = verifier
            .verify_two_tier("Hi", &out.log_signature, &out.log_signature, out.timestamp, &pair.public_key, &log)
            .unwrap();
        assert!(!result.level1_valid && !result.level2_valid && !result.is_valid);
        assert_eq!(result.errors, vec![ErrorKind::SignatureInvalid]);
        assert!(result.reconstructed_text.is_empty());
    }

    #[test]
    fn artifact_without_log_reports_fetch_failure() {
        let (verifier, pair, _, out) = setup("Hi");
        let artifact = out.into_artifact("Hi", pair.public_key);
        let result = verifier.verify_artifact(&artifact, None).unwrap();
        assert!(result.level1_valid);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![ErrorKind::LogFetchFailure]);
    }

    #[test]
    fn batch_reports_each_item() {
        let (verifier, pair, log, out) = setup("Hi");
        let good = out.into_artifact("Hi", pair.public_key);
        let mut bad = good.clone();
        bad.text = "Hi!".into();
        let results = verifier.verify_batch([(&good, Some(&log)), (&bad, Some(&log))]);
        assert!(results[0].as_ref().unwrap().is_valid);
        assert!(!results[1].as_ref().unwrap().level1_valid);
    }
}
