//! Canonical byte encodings for the two signatures.
//!
//! Layout: `domain_separator || field*`, where each field is
//! `tag (u8) || length (u64, big-endian) || value`. Fields appear in a fixed
//! order per domain; the separators keep a content signature from ever
//! verifying as a log signature and vice versa.

use crate::TextHash;

/// Domain separator for content (Level 1) signatures.
pub const CONTENT_DOMAIN_SEPARATOR: &[u8] = b"hav:content:v1\0";

/// Domain separator for log (Level 2) signatures.
pub const LOG_DOMAIN_SEPARATOR: &[u8] = b"hav:log:v1\0";

/// Field tag: UTF-8 text.
pub const TAG_TEXT: u8 = 0x01;
/// Field tag: signing timestamp, u64 big-endian milliseconds.
pub const TAG_TIMESTAMP: u8 = 0x02;
/// Field tag: event log in its signing encoding (u64 length prefixes).
pub const TAG_LOG: u8 = 0x03;
/// Field tag: raw 32-byte text hash.
pub const TAG_TEXT_HASH: u8 = 0x04;

/// Incremental builder for a tagged signing input.
#[derive(Debug, Clone)]
pub struct SigningInput {
    bytes: Vec<u8>,
}

impl SigningInput {
    /// Starts a new input under `domain`.
    pub fn new(domain: &[u8]) -> Self {
        Self {
            bytes: domain.to_vec(),
        }
    }

    /// Appends a length-prefixed field.
    pub fn field(mut self, tag: u8, value: &[u8]) -> Self {
        self.bytes.push(tag);
        self.bytes
            .extend_from_slice(&(value.len() as u64).to_be_bytes());
        self.bytes.extend_from_slice(value);
        self
    }

    /// Appends a u64 field as 8 big-endian bytes.
    pub fn u64_field(self, tag: u8, value: u64) -> Self {
        self.field(tag, &value.to_be_bytes())
    }

    /// Returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Bytes covered by the content signature: exactly `{text, timestamp}`.
pub fn content_signing_input(text: &str, timestamp: u64) -> Vec<u8> {
    SigningInput::new(CONTENT_DOMAIN_SEPARATOR)
        .field(TAG_TEXT, text.as_bytes())
        .u64_field(TAG_TIMESTAMP, timestamp)
        .into_bytes()
}

/// Bytes covered by the log signature: `{log, textHash, timestamp}`.
///
/// `encoded_log` is the signing encoding of the event log (`hav_log::signing_bytes`).
pub fn log_signing_input(encoded_log: &[u8], text_hash: &TextHash, timestamp: u64) -> Vec<u8> {
    SigningInput::new(LOG_DOMAIN_SEPARATOR)
        .field(TAG_LOG, encoded_log)
        .field(TAG_TEXT_HASH, text_hash.as_bytes())
        .u64_field(TAG_TIMESTAMP, timestamp)
        .into_bytes()
}
