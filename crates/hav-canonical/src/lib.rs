//! Canonical primitives for human authorship proofs.
//!
//! Every byte sequence that is hashed or signed is produced by this crate:
//! - text digests (`sha256(trim(text))`)
//! - domain-separated signing inputs for the content and log signatures
//! - canonical-JSON fingerprints of event logs
//!
//! Signer and verifier must agree on these bytes exactly, so nothing here
//! depends on field insertion order or host serialization defaults.
#![deny(missing_docs)]

/// Canonical JSON (RFC 8785) serialization.
pub mod canonicalizer;
/// Digest primitives.
pub mod digest;
/// Domain-separated fingerprints of serializable documents.
pub mod fingerprint;
/// Whitespace normalization used when comparing texts.
pub mod normalize;
/// Tagged byte encodings signed by the content and log signatures.
pub mod signing_input;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{canonical_json_bytes, CanonicalizationError};
pub use digest::{text_hash, Digest, DigestAlg, TextHash};
pub use fingerprint::{compute_fingerprint, verify_fingerprint, FingerprintError};
pub use normalize::normalize_whitespace;
pub use signing_input::{content_signing_input, log_signing_input, SigningInput};
pub use validation::ValidationError;
