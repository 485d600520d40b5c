use thiserror::Error;

/// Errors produced while encoding, decoding, reading or writing event logs.
///
/// Everything except `Io` and `Json` is a malformed-TLV condition; the codec
/// never guesses past one.
#[derive(Error, Debug)]
pub enum TlvError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON log document could not be parsed or written.
    #[error("JSON log error: {0}")]
    Json(#[from] serde_json::Error),
    /// Record type byte is not one of the known event kinds.
    #[error("unknown record type 0x{type_code:02x} at offset {offset}")]
    UnknownType {
        /// Byte offset where the record starts.
        offset: u64,
        /// Offending type byte.
        type_code: u8,
    },
    /// Input ended inside a record header or value.
    #[error("truncated record at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        /// Byte offset where the record starts.
        offset: u64,
        /// Bytes required to complete the record.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
    /// A field inside a record runs past the record's declared length.
    #[error("field `{field}` overruns record at offset {offset}")]
    LengthOverrun {
        /// Byte offset where the record starts.
        offset: u64,
        /// Field being read.
        field: &'static str,
    },
    /// A record declares more value bytes than its fields consume.
    #[error("{extra} unconsumed bytes in record at offset {offset}")]
    TrailingBytes {
        /// Byte offset where the record starts.
        offset: u64,
        /// Number of leftover bytes.
        extra: usize,
    },
    /// A string field is not valid UTF-8.
    #[error("invalid UTF-8 in field `{field}` of record at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where the record starts.
        offset: u64,
        /// Field being read.
        field: &'static str,
    },
    /// A string or record is too long for its 16-bit length prefix.
    #[error("{field} is {size} bytes, exceeding maximum {max}")]
    ValueTooLarge {
        /// Field or record being encoded.
        field: &'static str,
        /// Actual size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },
}
