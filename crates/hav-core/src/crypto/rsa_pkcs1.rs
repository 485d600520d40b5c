use rand_core::OsRng;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::{ensure_algorithm, CryptoError, CryptoProvider, KeyAlgorithm, KeyPairProvider};
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::signature::SignatureBytes;

/// Modulus size used for generated keys unless overridden.
pub const DEFAULT_RSA_MODULUS_BITS: usize = 2048;

/// Software RSA backend: RSASSA-PKCS1-v1_5 with SHA-256.
///
/// Keys are DER: PKCS#8 for the private half, SPKI for the public half.
#[derive(Debug, Clone, Copy)]
pub struct RsaProvider {
    modulus_bits: usize,
}

impl RsaProvider {
    /// Backend generating keys of `modulus_bits` bits. Verification accepts any size.
    pub fn with_modulus_bits(modulus_bits: usize) -> Self {
        Self { modulus_bits }
    }
}

impl Default for RsaProvider {
    fn default() -> Self {
        Self::with_modulus_bits(DEFAULT_RSA_MODULUS_BITS)
    }
}

impl KeyPairProvider for RsaProvider {
    fn generate_keypair(&self) -> Result<KeyPair, CryptoError> {
        let private = RsaPrivateKey::new(&mut OsRng, self.modulus_bits)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = RsaPublicKey::from(&private);

        let private_der = private
            .to_pkcs8_der()
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public_der = public
            .to_public_key_der()
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

        Ok(KeyPair {
            public_key: PublicKey::from_key_bytes(KeyAlgorithm::RsaPkcs1Sha256, public_der.as_bytes()),
            private_key: PrivateKey::from_key_bytes(
                KeyAlgorithm::RsaPkcs1Sha256,
                private_der.as_bytes(),
            ),
        })
    }
}

impl CryptoProvider for RsaProvider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::RsaPkcs1Sha256
    }

    fn sign(&self, message: &[u8], key: &PrivateKey) -> Result<SignatureBytes, CryptoError> {
        ensure_algorithm(KeyAlgorithm::RsaPkcs1Sha256, key.alg)?;
        let private = RsaPrivateKey::from_pkcs8_der(&key.key_bytes()?)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let signature = SigningKey::<Sha256>::new(private)
            .try_sign(message)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(SignatureBytes::new(signature.to_vec()))
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &SignatureBytes,
        key: &PublicKey,
    ) -> Result<bool, CryptoError> {
        ensure_algorithm(KeyAlgorithm::RsaPkcs1Sha256, key.alg)?;
        let public = RsaPublicKey::from_public_key_der(&key.key_bytes()?)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let Ok(signature) = Signature::try_from(signature.as_bytes()) else {
            return Ok(false);
        };
        Ok(VerifyingKey::<Sha256>::new(public)
            .verify(message, &signature)
            .is_ok())
    }
}
