//! Canonical TLV encoding of event logs.
//!
//! A log is a plain concatenation of records, `type (u8) | length (u16 BE) | value`.
//! Value layouts per record type (strings are `u16 BE length | UTF-8`, integers
//! are fixed-width big-endian):
//!
//! | type | value |
//! |------|-------|
//! | `Input` | old_value, new_value, selection_start u32, selection_end u32, cursor u32, time u64 |
//! | `Insert` | char, cursor u32, time u64 |
//! | `Backspace` / `Delete` | cursor u32, time u64 |
//! | `Selection` | cursor u32, selection_start u32, selection_end u32, time u64 |
//! | `KeyDown` / `KeyUp` | key, time u64 |
//!
//! Decoding is a single strict pass: unknown types, truncation and length
//! mismatches are all errors.

use crate::errors::TlvError;
use crate::event::{Event, Log};
use crate::frame::{EventKind, RecordHeader, MAX_VALUE_SIZE, RECORD_HEADER_SIZE};

/// Encodes a log into its canonical TLV bytes.
///
/// Fails only when a string or record exceeds its 16-bit length prefix.
///
/// # Example
///
/// ```rust
/// use hav_log::{decode, encode, Event, Log};
///
/// let log = Log::new(vec![Event::Backspace { cursor: 2, time: 1_700_000_000_000 }]);
/// let bytes = encode(&log)?;
/// assert_eq!(&bytes[..3], &[0x03, 0x00, 0x0c]);
/// assert_eq!(decode(&bytes)?, log);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode(log: &Log) -> Result<Vec<u8>, TlvError> {
    let mut out = Vec::new();
    for event in log {
        encode_event(event, &mut out)?;
    }
    Ok(out)
}

/// Appends one encoded record to `out`.
pub fn encode_event(event: &Event, out: &mut Vec<u8>) -> Result<(), TlvError> {
    let mut value = ValueWriter::default();
    write_fields(event, &mut value)?;

    let header = RecordHeader::new(event.kind(), value.buf.len())?;
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&value.buf);
    Ok(())
}

/// Encodes a log as the bytes covered by a log signature.
///
/// Same record order and field layout as [`encode`], but the record length
/// and every string length are u64 big-endian. Total: any log the data model
/// can hold has a signing encoding, whatever its size.
///
/// ```rust
/// use hav_log::{signing_bytes, Event, Log};
///
/// let log = Log::new(vec![Event::KeyDown { key: "a".into(), time: 1 }]);
/// let bytes = signing_bytes(&log);
/// assert_eq!(bytes[0], 0x06);
/// assert_eq!(&bytes[1..9], &17u64.to_be_bytes());
/// ```
pub fn signing_bytes(log: &Log) -> Vec<u8> {
    let mut out = Vec::new();
    for event in log {
        let mut value = WideValueWriter::default();
        match write_fields(event, &mut value) {
            Ok(()) => {}
            Err(never) => match never {},
        }
        out.push(event.kind().to_byte());
        out.extend_from_slice(&(value.buf.len() as u64).to_be_bytes());
        out.extend_from_slice(&value.buf);
    }
    out
}

/// Writes a record value field by field.
trait FieldSink {
    type Error;

    fn put_str(&mut self, field: &'static str, s: &str) -> Result<(), Self::Error>;
    fn put_u32(&mut self, v: u32);
    fn put_u64(&mut self, v: u64);
}

fn write_fields<S: FieldSink>(event: &Event, value: &mut S) -> Result<(), S::Error> {
    match event {
        Event::Input {
            old_value,
            new_value,
            selection_start,
            selection_end,
            cursor,
            time,
        } => {
            value.put_str("old_value", old_value)?;
            value.put_str("new_value", new_value)?;
            value.put_u32(*selection_start);
            value.put_u32(*selection_end);
            value.put_u32(*cursor);
            value.put_u64(*time);
        }
        Event::Insert { ch, cursor, time } => {
            value.put_str("char", ch)?;
            value.put_u32(*cursor);
            value.put_u64(*time);
        }
        Event::Backspace { cursor, time } | Event::Delete { cursor, time } => {
            value.put_u32(*cursor);
            value.put_u64(*time);
        }
        Event::Selection {
            cursor,
            selection_start,
            selection_end,
            time,
        } => {
            value.put_u32(*cursor);
            value.put_u32(*selection_start);
            value.put_u32(*selection_end);
            value.put_u64(*time);
        }
        Event::KeyDown { key, time } | Event::KeyUp { key, time } => {
            value.put_str("key", key)?;
            value.put_u64(*time);
        }
    }
    Ok(())
}

/// Decodes canonical TLV bytes into a log.
pub fn decode(bytes: &[u8]) -> Result<Log, TlvError> {
    let mut events = Vec::new();
    let mut pos = 0usize;
    while pos < bytes.len() {
        let offset = pos as u64;
        let header = RecordHeader::from_bytes(&bytes[pos..], offset)?;
        let start = pos + RECORD_HEADER_SIZE;
        let end = start + header.len as usize;
        if end > bytes.len() {
            return Err(TlvError::Truncated {
                offset,
                needed: RECORD_HEADER_SIZE + header.len as usize,
                available: bytes.len() - pos,
            });
        }
        events.push(decode_value(header.kind, &bytes[start..end], offset)?);
        pos = end;
    }
    Ok(Log::new(events))
}

/// Decodes the value of a single record whose header has already been read.
pub fn decode_value(kind: EventKind, value: &[u8], offset: u64) -> Result<Event, TlvError> {
    let mut r = ValueReader {
        buf: value,
        pos: 0,
        offset,
    };
    let event = match kind {
        EventKind::Input => Event::Input {
            old_value: r.str("old_value")?,
            new_value: r.str("new_value")?,
            selection_start: r.u32("selection_start")?,
            selection_end: r.u32("selection_end")?,
            cursor: r.u32("cursor")?,
            time: r.u64("time")?,
        },
        EventKind::Insert => Event::Insert {
            ch: r.str("char")?,
            cursor: r.u32("cursor")?,
            time: r.u64("time")?,
        },
        EventKind::Backspace => Event::Backspace {
            cursor: r.u32("cursor")?,
            time: r.u64("time")?,
        },
        EventKind::Delete => Event::Delete {
            cursor: r.u32("cursor")?,
            time: r.u64("time")?,
        },
        EventKind::Selection => Event::Selection {
            cursor: r.u32("cursor")?,
            selection_start: r.u32("selection_start")?,
            selection_end: r.u32("selection_end")?,
            time: r.u64("time")?,
        },
        EventKind::KeyDown => Event::KeyDown {
            key: r.str("key")?,
            time: r.u64("time")?,
        },
        EventKind::KeyUp => Event::KeyUp {
            key: r.str("key")?,
            time: r.u64("time")?,
        },
    };
    r.finish()?;
    Ok(event)
}

#[derive(Default)]
struct ValueWriter {
    buf: Vec<u8>,
}

impl FieldSink for ValueWriter {
    type Error = TlvError;

    fn put_str(&mut self, field: &'static str, s: &str) -> Result<(), TlvError> {
        let len = u16::try_from(s.len()).map_err(|_| TlvError::ValueTooLarge {
            field,
            size: s.len(),
            max: MAX_VALUE_SIZE,
        })?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
}

/// Value writer for [`signing_bytes`]: u64 string lengths, never fails.
#[derive(Default)]
struct WideValueWriter {
    buf: Vec<u8>,
}

impl FieldSink for WideValueWriter {
    type Error = std::convert::Infallible;

    fn put_str(&mut self, _field: &'static str, s: &str) -> Result<(), Self::Error> {
        self.buf.extend_from_slice(&(s.len() as u64).to_be_bytes());
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
}

struct ValueReader<'a> {
    buf: &'a [u8],
    pos: usize,
    offset: u64,
}

impl<'a> ValueReader<'a> {
    fn take(&mut self, field: &'static str, n: usize) -> Result<&'a [u8], TlvError> {
        if self.buf.len() - self.pos < n {
            return Err(TlvError::LengthOverrun {
                offset: self.offset,
                field,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn str(&mut self, field: &'static str) -> Result<String, TlvError> {
        let len = self.take(field, 2)?;
        let len = u16::from_be_bytes([len[0], len[1]]) as usize;
        let raw = self.take(field, len)?;
        let s = std::str::from_utf8(raw).map_err(|_| TlvError::InvalidUtf8 {
            offset: self.offset,
            field,
        })?;
        Ok(s.to_string())
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, TlvError> {
        let b = self.take(field, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self, field: &'static str) -> Result<u64, TlvError> {
        let b = self.take(field, 8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_be_bytes(arr))
    }

    fn finish(self) -> Result<(), TlvError> {
        let extra = self.buf.len() - self.pos;
        if extra != 0 {
            return Err(TlvError::TrailingBytes {
                offset: self.offset,
                extra,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> Log {
        Log::new(vec![
            Event::KeyDown { key: "H".into(), time: 1_000 },
            Event::Insert { ch: "H".into(), cursor: 0, time: 1_001 },
            Event::KeyUp { key: "H".into(), time: 1_080 },
            Event::Input {
                old_value: "H".into(),
                new_value: "Hé😀".into(),
                selection_start: 3,
                selection_end: 3,
                cursor: 3,
                time: 1_200,
            },
            Event::Selection { cursor: 1, selection_start: 0, selection_end: 2, time: 1_300 },
            Event::Backspace { cursor: 3, time: 1_400 },
            Event::Delete { cursor: 0, time: 1_500 },
        ])
    }

    #[test]
    fn signing_bytes_cover_values_beyond_tlv_limits() {
        let big = "x".repeat(40_000);
        let log = Log::new(vec![Event::Input {
            old_value: big[1..].to_string(),
            new_value: big.clone(),
            selection_start: 40_000,
            selection_end: 40_000,
            cursor: 40_000,
            time: 7,
        }]);
        assert!(matches!(encode(&log).unwrap_err(), TlvError::ValueTooLarge { .. }));

        let bytes = signing_bytes(&log);
        let value_len = 8 + 39_999 + 8 + 40_000 + 4 + 4 + 4 + 8;
        assert_eq!(bytes[0], 0x01);
        assert_eq!(&bytes[1..9], &(value_len as u64).to_be_bytes());
        assert_eq!(bytes.len(), 9 + value_len);
    }

    #[test]
    fn signing_bytes_differ_from_tlv_but_track_content() {
        let log = sample_log();
        assert_ne!(signing_bytes(&log), encode(&log).unwrap());
        let mut events = log.clone().into_events();
        events.pop();
        assert_ne!(signing_bytes(&log), signing_bytes(&Log::new(events)));
        assert!(signing_bytes(&Log::default()).is_empty());
    }

    #[test]
    fn backspace_record_layout() {
        let bytes = encode(&Log::new(vec![Event::Backspace { cursor: 2, time: 0x0102 }])).unwrap();
        assert_eq!(
            bytes,
            vec![0x03, 0x00, 0x0c, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0x01, 0x02]
        );
    }

    #[test]
    fn key_record_layout() {
        let bytes = encode(&Log::new(vec![Event::KeyUp { key: "ab".into(), time: 7 }])).unwrap();
        assert_eq!(
            bytes,
            vec![0x07, 0x00, 0x0c, 0x00, 0x02, b'a', b'b', 0, 0, 0, 0, 0, 0, 0, 7]
        );
    }

    #[test]
    fn mixed_log_round_trips() {
        let log = sample_log();
        assert_eq!(decode(&encode(&log).unwrap()).unwrap(), log);
    }

    #[test]
    fn empty_input_is_empty_log() {
        assert!(decode(&[]).unwrap().is_empty());
        assert!(encode(&Log::default()).unwrap().is_empty());
    }

    #[test]
    fn unknown_type_is_fatal_with_offset() {
        let mut bytes = encode(&sample_log()).unwrap();
        let first_len = RECORD_HEADER_SIZE + u16::from_be_bytes([bytes[1], bytes[2]]) as usize;
        bytes[first_len] = 0x2a;
        match decode(&bytes).unwrap_err() {
            TlvError::UnknownType { offset, type_code } => {
                assert_eq!(offset, first_len as u64);
                assert_eq!(type_code, 0x2a);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_value_is_fatal() {
        let bytes = encode(&sample_log()).unwrap();
        let err = decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, TlvError::Truncated { .. }), "{err}");
        let err = decode(&bytes[..1]).unwrap_err();
        assert!(matches!(err, TlvError::Truncated { offset: 0, .. }), "{err}");
    }

    #[test]
    fn declared_length_too_short_overruns_field() {
        // Delete record claiming 4 value bytes: cursor fits, time does not.
        let bytes = [0x04, 0x00, 0x04, 0, 0, 0, 1];
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            TlvError::LengthOverrun { field: "time", .. }
        ));
    }

    #[test]
    fn declared_length_too_long_leaves_trailing_bytes() {
        let mut bytes = encode(&Log::new(vec![Event::Delete { cursor: 1, time: 2 }])).unwrap();
        bytes[2] += 1;
        bytes.push(0xff);
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            TlvError::TrailingBytes { extra: 1, .. }
        ));
    }

    #[test]
    fn string_length_overrunning_record_is_rejected() {
        // KeyDown with key length 10 but only 2 bytes present.
        let bytes = [0x06, 0x00, 0x04, 0x00, 0x0a, b'a', b'b'];
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            TlvError::LengthOverrun { field: "key", .. }
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let bytes = [0x06, 0x00, 0x0b, 0x00, 0x01, 0xff, 0, 0, 0, 0, 0, 0, 0, 1];
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            TlvError::InvalidUtf8 { field: "key", .. }
        ));
    }

    #[test]
    fn oversized_string_fails_to_encode() {
        let log = Log::new(vec![Event::KeyDown {
            key: "x".repeat(MAX_VALUE_SIZE + 1),
            time: 0,
        }]);
        assert!(matches!(
            encode(&log).unwrap_err(),
            TlvError::ValueTooLarge { field: "key", .. }
        ));
    }

    #[test]
    fn record_over_limit_fails_even_when_strings_fit() {
        let half = "y".repeat(MAX_VALUE_SIZE / 2 + 1);
        let log = Log::new(vec![Event::Input {
            old_value: half.clone(),
            new_value: half,
            selection_start: 0,
            selection_end: 0,
            cursor: 0,
            time: 0,
        }]);
        assert!(matches!(
            encode(&log).unwrap_err(),
            TlvError::ValueTooLarge { field: "record", .. }
        ));
    }
}
