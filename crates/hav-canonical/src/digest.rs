use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

use crate::validation::ValidationError;

/// Supported digest algorithms for canonical identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// SHA-256 (the only algorithm in use).
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + bytes digest, encoded as base64url without padding.
///
/// Deserialization goes through [`Digest::new`], so a malformed `b64` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDigest")]
pub struct Digest {
    /// Digest algorithm (currently always `sha-256`).
    pub alg: DigestAlg,
    /// Base64URL (no padding) digest bytes.
    #[serde(rename = "b64")]
    pub b64: String,
}

impl Digest {
    /// Constructs a validated digest.
    pub fn new(alg: DigestAlg, b64: impl Into<String>) -> Result<Self, ValidationError> {
        let b64 = b64.into();
        let re = Regex::new(r"^[A-Za-z0-9_-]{43,44}$").expect("invalid regex");
        if !re.is_match(&b64) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: b64,
            });
        }
        Ok(Digest { alg, b64 })
    }

    /// Hashes `parts` in order with SHA-256 and wraps the result.
    pub fn sha256_of(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        use base64::Engine;
        let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize());
        Digest {
            alg: DigestAlg::Sha256,
            b64,
        }
    }
}

#[derive(Deserialize)]
struct RawDigest {
    alg: DigestAlg,
    b64: String,
}

impl TryFrom<RawDigest> for Digest {
    type Error = ValidationError;

    fn try_from(raw: RawDigest) -> Result<Self, Self::Error> {
        Digest::new(raw.alg, raw.b64)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha-256:{}", self.b64)
    }
}

/// SHA-256 digest of a text, taken over its trimmed UTF-8 bytes.
///
/// Serialized as a lowercase hex string, the form carried in signed payloads.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextHash([u8; 32]);

impl TextHash {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a 64-character hex string.
    pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
        let mismatch = || ValidationError::PatternMismatch {
            field: "text_hash",
            value: value.to_string(),
        };
        let bytes = hex::decode(value).map_err(|_| mismatch())?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| mismatch())?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 32]> for TextHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for TextHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextHash({})", self.to_hex())
    }
}

impl fmt::Display for TextHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for TextHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TextHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TextHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hashes a text the way both signer and verifier must: leading and trailing
/// whitespace is trimmed, then the UTF-8 bytes are fed to SHA-256.
///
/// ```rust
/// use hav_canonical::text_hash;
///
/// assert_eq!(text_hash("  Hi \n"), text_hash("Hi"));
/// ```
pub fn text_hash(text: &str) -> TextHash {
    let digest = Sha256::digest(text.trim().as_bytes());
    TextHash(digest.into())
}
