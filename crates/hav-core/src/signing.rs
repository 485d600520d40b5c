//! Content (Level 1) and log (Level 2) signing.

use chrono::Utc;
use hav_canonical::{content_signing_input, log_signing_input, TextHash};
use hav_log::{signing_bytes, Log};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifact::SignedArtifact;
use crate::crypto::CryptoProvider;
use crate::errors::CoreError;
use crate::keys::{PrivateKey, PublicKey};
use crate::signature::SignatureBytes;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    // Clamp pre-epoch clocks to zero.
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Logical payload covered by the log signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPayload {
    /// Captured events.
    pub log: Log,
    /// Digest of the signed text.
    pub text_hash: TextHash,
    /// Signing timestamp (ms).
    pub timestamp: u64,
}

/// Both signatures plus what they cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutput {
    /// Level 1 signature.
    pub content_signature: SignatureBytes,
    /// Level 2 signature.
    pub log_signature: SignatureBytes,
    /// Timestamp shared by both signatures.
    pub timestamp: u64,
    /// Payload bound by the log signature.
    pub signed_data: SignedPayload,
}

impl SignOutput {
    /// Packages the signatures with the text and key for publication.
    pub fn into_artifact(self, text: impl Into<String>, public_key: PublicKey) -> SignedArtifact {
        SignedArtifact {
            text: text.into(),
            timestamp: self.timestamp,
            content_signature: self.content_signature,
            log_signature: self.log_signature,
            public_key,
            log_location: None,
            fingerprint: None,
        }
    }
}

/// Produces content and log signatures through one provider.
#[derive(Debug, Clone)]
pub struct Signer<P> {
    provider: P,
}

impl<P: CryptoProvider> Signer<P> {
    /// Wraps a provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Signs `{text, timestamp}`.
    pub fn sign_content(
        &self,
        text: &str,
        timestamp: u64,
        key: &PrivateKey,
    ) -> Result<SignatureBytes, CoreError> {
        let input = content_signing_input(text, timestamp);
        Ok(self.provider.sign(&input, key)?)
    }

    /// Signs `{log, digest(text), timestamp}`.
    pub fn sign_log(
        &self,
        log: &Log,
        text: &str,
        timestamp: u64,
        key: &PrivateKey,
    ) -> Result<(SignatureBytes, SignedPayload), CoreError> {
        let text_hash = self.provider.digest(text);
        let input = log_signing_input(&signing_bytes(log), &text_hash, timestamp);
        let signature = self.provider.sign(&input, key)?;
        Ok((
            signature,
            SignedPayload {
                log: log.clone(),
                text_hash,
                timestamp,
            },
        ))
    }

    /// Signs both levels at the current time.
    pub fn sign(&self, log: &Log, text: &str, key: &PrivateKey) -> Result<SignOutput, CoreError> {
        self.sign_at(log, text, now_millis(), key)
    }

    /// Signs both levels at an explicit timestamp.
    pub fn sign_at(
        &self,
        log: &Log,
        text: &str,
        timestamp: u64,
        key: &PrivateKey,
    ) -> Result<SignOutput, CoreError> {
        let content_signature = self.sign_content(text, timestamp, key)?;
        let (log_signature, signed_data) = self.sign_log(log, text, timestamp, key)?;
        info!(
            alg = %self.provider.algorithm(),
            events = log.len(),
            timestamp,
            "signed content and log"
        );
        Ok(SignOutput {
            content_signature,
            log_signature,
            timestamp,
            signed_data,
        })
    }
}
