//! Published artifact: the signed text, both signatures and the key.

use hav_canonical::{compute_fingerprint, Digest, FingerprintError};
use hav_log::Log;
use serde::{Deserialize, Serialize};

use crate::keys::PublicKey;
use crate::signature::SignatureBytes;

/// Everything a verifier needs besides the log itself.
///
/// Created once at signing time and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedArtifact {
    /// Displayed text, exactly as signed by the content signature.
    pub text: String,
    /// Signing timestamp shared by both signatures (ms since epoch).
    pub timestamp: u64,
    /// Level 1 signature over `{text, timestamp}`.
    pub content_signature: SignatureBytes,
    /// Level 2 signature over `{log, textHash, timestamp}`.
    pub log_signature: SignatureBytes,
    /// Signer's public key.
    pub public_key: PublicKey,
    /// Where the log is published (URL or path). Resolved by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_location: Option<String>,
    /// Fingerprint of the published log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Digest>,
}

impl SignedArtifact {
    /// Sets the log location.
    pub fn with_log_location(mut self, location: impl Into<String>) -> Self {
        self.log_location = Some(location.into());
        self
    }

    /// Records the fingerprint of `log`.
    pub fn with_fingerprint_of(mut self, log: &Log) -> Result<Self, FingerprintError> {
        self.fingerprint = Some(log_fingerprint(log)?);
        Ok(self)
    }
}

/// Fingerprint of a log's event list. Independent of the wire format it was loaded from.
pub fn log_fingerprint(log: &Log) -> Result<Digest, FingerprintError> {
    compute_fingerprint(log)
}
