use crate::errors::TlvError;

/// Record header size in bytes: type (1) + length (2).
pub const RECORD_HEADER_SIZE: usize = 3;

/// Maximum value length expressible by the 16-bit length field.
pub const MAX_VALUE_SIZE: usize = u16::MAX as usize;

/// Record type: `Input`.
pub const TYPE_INPUT: u8 = 0x01;
/// Record type: `Insert`.
pub const TYPE_INSERT: u8 = 0x02;
/// Record type: `Backspace`.
pub const TYPE_BACKSPACE: u8 = 0x03;
/// Record type: `Delete`.
pub const TYPE_DELETE: u8 = 0x04;
/// Record type: `Selection`.
pub const TYPE_SELECTION: u8 = 0x05;
/// Record type: `KeyDown`.
pub const TYPE_KEY_DOWN: u8 = 0x06;
/// Record type: `KeyUp`.
pub const TYPE_KEY_UP: u8 = 0x07;

/// Event discriminant, doubling as the TLV record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Full-text snapshot.
    Input,
    /// Single code point insertion.
    Insert,
    /// Delete before cursor.
    Backspace,
    /// Delete at cursor.
    Delete,
    /// Selection change.
    Selection,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
}

impl EventKind {
    /// Maps a type byte to a kind; `None` for unknown codes.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            TYPE_INPUT => Some(EventKind::Input),
            TYPE_INSERT => Some(EventKind::Insert),
            TYPE_BACKSPACE => Some(EventKind::Backspace),
            TYPE_DELETE => Some(EventKind::Delete),
            TYPE_SELECTION => Some(EventKind::Selection),
            TYPE_KEY_DOWN => Some(EventKind::KeyDown),
            TYPE_KEY_UP => Some(EventKind::KeyUp),
            _ => None,
        }
    }

    /// Returns the type byte for this kind.
    pub fn to_byte(self) -> u8 {
        match self {
            EventKind::Input => TYPE_INPUT,
            EventKind::Insert => TYPE_INSERT,
            EventKind::Backspace => TYPE_BACKSPACE,
            EventKind::Delete => TYPE_DELETE,
            EventKind::Selection => TYPE_SELECTION,
            EventKind::KeyDown => TYPE_KEY_DOWN,
            EventKind::KeyUp => TYPE_KEY_UP,
        }
    }
}

/// Record header (3 bytes): `type | length (u16, big-endian)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Record type.
    pub kind: EventKind,
    /// Value length in bytes, excluding this header.
    pub len: u16,
}

impl RecordHeader {
    /// Creates a header, rejecting values longer than [`MAX_VALUE_SIZE`].
    pub fn new(kind: EventKind, len: usize) -> Result<Self, TlvError> {
        let len = u16::try_from(len).map_err(|_| TlvError::ValueTooLarge {
            field: "record",
            size: len,
            max: MAX_VALUE_SIZE,
        })?;
        Ok(Self { kind, len })
    }

    /// Serializes the header to bytes.
    pub fn to_bytes(&self) -> [u8; RECORD_HEADER_SIZE] {
        let len = self.len.to_be_bytes();
        [self.kind.to_byte(), len[0], len[1]]
    }

    /// Deserializes a header from bytes; `offset` is used for error reporting.
    pub fn from_bytes(bytes: &[u8], offset: u64) -> Result<Self, TlvError> {
        if bytes.len() < RECORD_HEADER_SIZE {
            return Err(TlvError::Truncated {
                offset,
                needed: RECORD_HEADER_SIZE,
                available: bytes.len(),
            });
        }

        let kind = EventKind::from_byte(bytes[0]).ok_or(TlvError::UnknownType {
            offset,
            type_code: bytes[0],
        })?;
        let len = u16::from_be_bytes([bytes[1], bytes[2]]);

        Ok(Self { kind, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let header = RecordHeader::new(EventKind::Selection, 20).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(bytes, [0x05, 0x00, 0x14]);
        assert_eq!(RecordHeader::from_bytes(&bytes, 0).unwrap(), header);
    }

    #[test]
    fn header_rejects_unknown_type() {
        let err = RecordHeader::from_bytes(&[0x08, 0, 0], 12).unwrap_err();
        assert!(matches!(
            err,
            TlvError::UnknownType { offset: 12, type_code: 0x08 }
        ));
        assert!(RecordHeader::from_bytes(&[0x00, 0, 0], 0).is_err());
    }

    #[test]
    fn header_rejects_short_input() {
        assert!(matches!(
            RecordHeader::from_bytes(&[0x01, 0x00], 4).unwrap_err(),
            TlvError::Truncated { offset: 4, needed: 3, available: 2 }
        ));
    }

    #[test]
    fn header_rejects_oversized_value() {
        assert!(RecordHeader::new(EventKind::Input, MAX_VALUE_SIZE + 1).is_err());
        assert!(RecordHeader::new(EventKind::Input, MAX_VALUE_SIZE).is_ok());
    }

    #[test]
    fn type_codes_are_stable() {
        let kinds = [
            EventKind::Input,
            EventKind::Insert,
            EventKind::Backspace,
            EventKind::Delete,
            EventKind::Selection,
            EventKind::KeyDown,
            EventKind::KeyUp,
        ];
        for (idx, kind) in kinds.iter().enumerate() {
            assert_eq!(kind.to_byte() as usize, idx + 1);
            assert_eq!(EventKind::from_byte(kind.to_byte()), Some(*kind));
        }
    }
}
