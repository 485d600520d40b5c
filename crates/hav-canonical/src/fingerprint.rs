//! Log fingerprints with domain-separated hashing.
//!
//! Fingerprints are computed as `sha256(domain_separator || canonical_json(document))`,
//! so a log carries the same fingerprint whichever wire format it arrived in.

use crate::{canonical_json_bytes, CanonicalizationError, Digest};
use serde::Serialize;
use serde_json::Value;

/// Domain separator for log fingerprints: `b"hav:log-fingerprint:v1\0"`.
const FINGERPRINT_DOMAIN_SEPARATOR: &[u8] = b"hav:log-fingerprint:v1\0";

/// Error during fingerprint computation.
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Computes the fingerprint of any serializable document.
///
/// # Example
///
/// ```rust
/// use hav_canonical::compute_fingerprint;
/// use serde_json::json;
///
/// let a = compute_fingerprint(&json!({"time": 1, "type": "keydown", "key": "a"}))?;
/// let b = compute_fingerprint(&json!({"key": "a", "type": "keydown", "time": 1}))?;
/// assert_eq!(a, b);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_fingerprint<T: Serialize>(document: &T) -> Result<Digest, FingerprintError> {
    let value: Value = serde_json::to_value(document)?;
    let bytes = canonical_json_bytes(&value)?;
    Ok(Digest::sha256_of(&[FINGERPRINT_DOMAIN_SEPARATOR, &bytes]))
}

/// Returns `true` if `claimed` is the fingerprint of `document`.
pub fn verify_fingerprint<T: Serialize>(
    document: &T,
    claimed: &Digest,
) -> Result<bool, FingerprintError> {
    Ok(&compute_fingerprint(document)? == claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fingerprint_is_order_independent_and_content_sensitive() {
        let doc = json!([{"type": "insert", "char": "H", "cursor": 0, "time": 5}]);
        let fp = compute_fingerprint(&doc).unwrap();
        assert!(verify_fingerprint(&doc, &fp).unwrap());

        let other = json!([{"type": "insert", "char": "h", "cursor": 0, "time": 5}]);
        assert!(!verify_fingerprint(&other, &fp).unwrap());
    }

    #[test]
    fn fingerprint_is_domain_separated() {
        let doc = json!({"a": 1});
        let plain = Digest::sha256_of(&[&canonical_json_bytes(&doc).unwrap()]);
        assert_ne!(compute_fingerprint(&doc).unwrap(), plain);
    }
}
