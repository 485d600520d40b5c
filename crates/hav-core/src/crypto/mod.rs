//! Signature capability and its backends.
//!
//! The core never inspects its environment to pick an algorithm. A caller
//! composes one [`CryptoProvider`] up front (directly, or via
//! [`provider_for`]) and every signing and verification call goes through it.

mod ed25519;
mod rsa_pkcs1;

pub use self::ed25519::Ed25519Provider;
pub use self::rsa_pkcs1::{RsaProvider, DEFAULT_RSA_MODULUS_BITS};

use hav_canonical::{text_hash, TextHash};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::signature::SignatureBytes;

/// Errors raised by crypto backends and key handling.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// No backend can serve the request (unknown algorithm or a key of the wrong algorithm).
    #[error("unsupported capability: {0}")]
    UnsupportedCapability(String),
    /// Key material could not be decoded or imported.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    /// The backend failed to produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Asymmetric signature algorithms with a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// Ed25519 (RFC 8032).
    #[serde(rename = "ed25519")]
    Ed25519,
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    #[serde(rename = "rsa-pkcs1-sha256")]
    RsaPkcs1Sha256,
}

impl KeyAlgorithm {
    /// Stable identifier used in key handles and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyAlgorithm::Ed25519 => "ed25519",
            KeyAlgorithm::RsaPkcs1Sha256 => "rsa-pkcs1-sha256",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(KeyAlgorithm::Ed25519),
            "rsa" | "rsa-pkcs1-sha256" => Ok(KeyAlgorithm::RsaPkcs1Sha256),
            other => Err(CryptoError::UnsupportedCapability(format!(
                "no backend for algorithm `{other}`"
            ))),
        }
    }
}

/// Generates key pairs in the portable [`KeyPair`] representation.
pub trait KeyPairProvider {
    /// Creates a fresh key pair.
    fn generate_keypair(&self) -> Result<KeyPair, CryptoError>;
}

/// Hash, sign and verify capability consumed by the signers and verifiers.
///
/// `verify` returns `Ok(false)` for any signature that does not check out,
/// including one of the wrong length. `Err` means the key itself is unusable.
pub trait CryptoProvider: KeyPairProvider + Send + Sync {
    /// Algorithm this backend implements.
    fn algorithm(&self) -> KeyAlgorithm;

    /// Content digest of a text (SHA-256 over the trimmed UTF-8 bytes).
    fn digest(&self, text: &str) -> TextHash {
        text_hash(text)
    }

    /// Signs `message` with `key`.
    fn sign(&self, message: &[u8], key: &PrivateKey) -> Result<SignatureBytes, CryptoError>;

    /// Checks `signature` over `message` against `key`.
    fn verify(
        &self,
        message: &[u8],
        signature: &SignatureBytes,
        key: &PublicKey,
    ) -> Result<bool, CryptoError>;
}

impl<T: KeyPairProvider + ?Sized> KeyPairProvider for Box<T> {
    fn generate_keypair(&self) -> Result<KeyPair, CryptoError> {
        (**self).generate_keypair()
    }
}

impl<T: CryptoProvider + ?Sized> CryptoProvider for Box<T> {
    fn algorithm(&self) -> KeyAlgorithm {
        (**self).algorithm()
    }

    fn digest(&self, text: &str) -> TextHash {
        (**self).digest(text)
    }

    fn sign(&self, message: &[u8], key: &PrivateKey) -> Result<SignatureBytes, CryptoError> {
        (**self).sign(message, key)
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &SignatureBytes,
        key: &PublicKey,
    ) -> Result<bool, CryptoError> {
        (**self).verify(message, signature, key)
    }
}

/// Returns the default backend for `alg`.
pub fn provider_for(alg: KeyAlgorithm) -> Box<dyn CryptoProvider> {
    match alg {
        KeyAlgorithm::Ed25519 => Box::new(Ed25519Provider),
        KeyAlgorithm::RsaPkcs1Sha256 => Box::new(RsaProvider::default()),
    }
}

/// Resolves a backend by algorithm name.
///
/// # Errors
///
/// Returns [`CryptoError::UnsupportedCapability`] for unknown names.
pub fn provider_named(name: &str) -> Result<Box<dyn CryptoProvider>, CryptoError> {
    Ok(provider_for(name.parse()?))
}

fn ensure_algorithm(
    expected: KeyAlgorithm,
    found: KeyAlgorithm,
) -> Result<(), CryptoError> {
    if expected != found {
        return Err(CryptoError::UnsupportedCapability(format!(
            "{expected} backend cannot use a {found} key"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for alg in [KeyAlgorithm::Ed25519, KeyAlgorithm::RsaPkcs1Sha256] {
            assert_eq!(alg.as_str().parse::<KeyAlgorithm>().unwrap(), alg);
            assert_eq!(
                serde_json::to_string(&alg).unwrap(),
                format!("\"{}\"", alg.as_str())
            );
        }
        assert_eq!("rsa".parse::<KeyAlgorithm>().unwrap(), KeyAlgorithm::RsaPkcs1Sha256);
    }

    #[test]
    fn unknown_algorithm_is_unsupported() {
        assert!(matches!(
            provider_named("rsa-pss").err().unwrap(),
            CryptoError::UnsupportedCapability(_)
        ));
        assert_eq!(provider_named("ed25519").unwrap().algorithm(), KeyAlgorithm::Ed25519);
    }

    #[test]
    fn default_digest_trims() {
        let provider = provider_for(KeyAlgorithm::Ed25519);
        assert_eq!(provider.digest(" Hi\n"), text_hash("Hi"));
    }
}
