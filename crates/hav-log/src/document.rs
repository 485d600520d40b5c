//! Structured (JSON) log documents and format detection.

use serde::{Deserialize, Serialize};

use crate::codec::decode;
use crate::errors::TlvError;
use crate::event::Log;

/// Published log file: the captured events plus the signing timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDocument {
    /// Captured events in replay order.
    pub log: Log,
    /// Signing timestamp in milliseconds.
    pub timestamp: u64,
}

/// Wire format of a serialized log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `{"log": [...], "timestamp": n}` document.
    JsonDocument,
    /// Bare JSON array of events.
    JsonEvents,
    /// Canonical TLV records.
    Tlv,
}

impl LogFormat {
    /// Detects the format from the first non-whitespace byte.
    ///
    /// No TLV record type is an ASCII brace or bracket, so the check is unambiguous.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => LogFormat::JsonDocument,
            Some(b'[') => LogFormat::JsonEvents,
            _ => LogFormat::Tlv,
        }
    }
}

/// Parses a log from any supported wire format.
///
/// Returns the log and, for JSON documents, the timestamp stored alongside it.
pub fn parse_log(bytes: &[u8]) -> Result<(Log, Option<u64>), TlvError> {
    match LogFormat::detect(bytes) {
        LogFormat::JsonDocument => {
            let doc: LogDocument = serde_json::from_slice(bytes)?;
            Ok((doc.log, Some(doc.timestamp)))
        }
        LogFormat::JsonEvents => Ok((serde_json::from_slice(bytes)?, None)),
        LogFormat::Tlv => Ok((decode(bytes)?, None)),
    }
}
