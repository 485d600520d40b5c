//! Human authorship verification.
//!
//! This crate provides:
//! - deterministic text reconstruction from an event log
//! - pluggable signature backends and portable key handles
//! - content (Level 1) and log (Level 2) signing
//! - two-tier verification with advisory heuristics
//!
//! Core invariants:
//! - Reconstruction is total and pure; malformed legacy events are skipped
//! - Both signatures share one timestamp and cover fixed canonical bytes
//! - Invalid input is reported in the result; only unusable keys are errors
//! - Heuristics never change validity
#![deny(missing_docs)]

/// Published signed artifacts and log fingerprints.
pub mod artifact;
/// Signature backends.
pub mod crypto;
/// Error types for core operations.
pub mod errors;
/// Plausibility heuristics.
pub mod heuristics;
/// Key handles.
pub mod keys;
/// Log replay.
pub mod reconstruct;
/// Verification outcomes.
pub mod result;
/// Signature bytes.
pub mod signature;
/// Signing.
pub mod signing;
/// Verification.
pub mod verification;

pub use artifact::{log_fingerprint, SignedArtifact};
pub use crypto::{
    provider_for, provider_named, CryptoError, CryptoProvider, Ed25519Provider, KeyAlgorithm,
    KeyPairProvider, RsaProvider, DEFAULT_RSA_MODULUS_BITS,
};
pub use errors::CoreError;
pub use heuristics::{check_security_features, HeuristicConfig};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use reconstruct::reconstruct;
pub use result::{ErrorKind, Level1Result, Level2Result, VerificationResult, Warning};
pub use signature::SignatureBytes;
pub use signing::{now_millis, SignOutput, SignedPayload, Signer};
pub use verification::{Verifier, VerifyOptions};
