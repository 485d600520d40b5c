//! Portable key handles.
//!
//! Key material travels as `{alg, b64}` where `b64` is base64url (no padding)
//! of the backend's native encoding. A public key additionally exports to a
//! single opaque blob suitable for an attribute or config value.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{CryptoError, KeyAlgorithm};

/// Public half of a key pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    /// Signature algorithm.
    pub alg: KeyAlgorithm,
    /// Base64URL (no padding) key bytes.
    pub b64: String,
}

impl PublicKey {
    /// Wraps raw key bytes.
    pub fn from_key_bytes(alg: KeyAlgorithm, bytes: &[u8]) -> Self {
        Self {
            alg,
            b64: URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Decodes the raw key bytes.
    pub fn key_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        decode_key(&self.b64)
    }

    /// Exports the key as standard base64 of its JSON form.
    pub fn to_blob(&self) -> Result<String, CryptoError> {
        let json =
            serde_json::to_vec(self).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }

    /// Imports a key from [`to_blob`](Self::to_blob) output or from plain JSON.
    ///
    /// ```rust
    /// use hav_core::{Ed25519Provider, KeyPairProvider, PublicKey};
    ///
    /// let pair = Ed25519Provider.generate_keypair()?;
    /// let blob = pair.public_key.to_blob()?;
    /// assert_eq!(PublicKey::from_blob(&blob)?, pair.public_key);
    ///
    /// let legacy = serde_json::to_string(&pair.public_key)?;
    /// assert_eq!(PublicKey::from_blob(&legacy)?, pair.public_key);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_blob(blob: &str) -> Result<Self, CryptoError> {
        let blob = blob.trim();
        if let Ok(decoded) = STANDARD.decode(blob) {
            if let Ok(key) = serde_json::from_slice::<PublicKey>(&decoded) {
                return Ok(key);
            }
        }
        serde_json::from_str(blob)
            .map_err(|e| CryptoError::InvalidKey(format!("unrecognized public key blob: {e}")))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.alg, self.b64)
    }
}

/// Private half of a key pair. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    /// Signature algorithm.
    pub alg: KeyAlgorithm,
    /// Base64URL (no padding) key bytes.
    pub b64: String,
}

impl PrivateKey {
    /// Wraps raw key bytes.
    pub fn from_key_bytes(alg: KeyAlgorithm, bytes: &[u8]) -> Self {
        Self {
            alg,
            b64: URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Decodes the raw key bytes.
    pub fn key_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        decode_key(&self.b64)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("alg", &self.alg)
            .field("b64", &"<redacted>")
            .finish()
    }
}

/// Key pair as produced by a [`KeyPairProvider`](crate::KeyPairProvider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// Public key, shared with verifiers.
    pub public_key: PublicKey,
    /// Private key, kept by the signer.
    pub private_key: PrivateKey,
}

fn decode_key(b64: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD
        .decode(b64)
        .map_err(|e| CryptoError::InvalidKey(format!("key is not base64url: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bytes_round_trip() {
        let key = PublicKey::from_key_bytes(KeyAlgorithm::Ed25519, &[0xfb, 0xff, 0x01]);
        assert_eq!(key.b64, "-_8B");
        assert_eq!(key.key_bytes().unwrap(), vec![0xfb, 0xff, 0x01]);
    }

    #[test]
    fn garbage_blob_is_rejected() {
        assert!(matches!(
            PublicKey::from_blob("not a key").unwrap_err(),
            CryptoError::InvalidKey(_)
        ));
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let key = PrivateKey::from_key_bytes(KeyAlgorithm::Ed25519, &[7; 32]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains(&key.b64));
    }

    #[test]
    fn key_pair_json_shape() {
        let pair = KeyPair {
            public_key: PublicKey::from_key_bytes(KeyAlgorithm::Ed25519, &[1]),
            private_key: PrivateKey::from_key_bytes(KeyAlgorithm::Ed25519, &[2]),
        };
        let value = serde_json::to_value(&pair).unwrap();
        assert_eq!(value["publicKey"]["alg"], "ed25519");
        assert_eq!(value["privateKey"]["b64"], "Ag");
    }
}
