use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;

use super::{ensure_algorithm, CryptoError, CryptoProvider, KeyAlgorithm, KeyPairProvider};
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::signature::SignatureBytes;

/// Software Ed25519 backend.
///
/// Keys are the raw 32-byte seed (private) and compressed point (public).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Provider;

fn key_array(bytes: Vec<u8>) -> Result<[u8; 32], CryptoError> {
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKey(format!("expected 32 bytes, got {len}")))
}

impl KeyPairProvider for Ed25519Provider {
    fn generate_keypair(&self) -> Result<KeyPair, CryptoError> {
        let signing_key = SigningKey::generate(&mut OsRng);
        Ok(KeyPair {
            public_key: PublicKey::from_key_bytes(
                KeyAlgorithm::Ed25519,
                signing_key.verifying_key().as_bytes(),
            ),
            private_key: PrivateKey::from_key_bytes(KeyAlgorithm::Ed25519, &signing_key.to_bytes()),
        })
    }
}

impl CryptoProvider for Ed25519Provider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ed25519
    }

    fn sign(&self, message: &[u8], key: &PrivateKey) -> Result<SignatureBytes, CryptoError> {
        ensure_algorithm(KeyAlgorithm::Ed25519, key.alg)?;
        let signing_key = SigningKey::from_bytes(&key_array(key.key_bytes()?)?);
        Ok(SignatureBytes::new(signing_key.sign(message).to_bytes().to_vec()))
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &SignatureBytes,
        key: &PublicKey,
    ) -> Result<bool, CryptoError> {
        ensure_algorithm(KeyAlgorithm::Ed25519, key.alg)?;
        let verifying_key = VerifyingKey::from_bytes(&key_array(key.key_bytes()?)?)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let Ok(signature) = Signature::from_slice(signature.as_bytes()) else {
            return Ok(false);
        };
        Ok(verifying_key.verify(message, &signature).is_ok())
    }
}
