//! Streaming TLV log reader.

use crate::codec::decode_value;
use crate::errors::TlvError;
use crate::event::{Event, Log};
use crate::frame::{RecordHeader, RECORD_HEADER_SIZE};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: truncated records are errors.
    Strict,
    /// Permissive mode: a truncated trailing record is treated as end-of-file.
    Permissive,
}

/// Reads events one record at a time from a TLV log file.
///
/// The file holds the same bytes [`encode`](crate::encode) produces, so a
/// strict reader accepts exactly what [`decode`](crate::decode) accepts.
/// Permissive mode exists for logs cut short by an interrupted capture:
/// the partial trailing record is dropped. Unknown record types and
/// malformed values are errors in both modes.
///
/// # Example
///
/// ```rust,no_run
/// use hav_log::{LogReader, ReadMode};
///
/// let mut reader = LogReader::open("session.havl", ReadMode::Strict)?;
/// while let Some(event) = reader.read_event()? {
///     println!("{:?} at {}", event.kind(), event.time());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LogReader<R = BufReader<File>> {
    inner: R,
    mode: ReadMode,
    position: u64,
}

impl LogReader {
    /// Opens a TLV log file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`TlvError::Io`] if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, TlvError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), mode))
    }
}

impl<R: Read> LogReader<R> {
    /// Wraps any byte source.
    pub fn new(inner: R, mode: ReadMode) -> Self {
        Self {
            inner,
            mode,
            position: 0,
        }
    }

    /// Returns the byte offset of the next record.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next event, or `Ok(None)` at end-of-file.
    ///
    /// # Errors
    ///
    /// Returns [`TlvError`] if:
    /// - A record has an unknown type or a malformed value
    /// - Truncation is detected (in strict mode)
    /// - An I/O error occurs
    pub fn read_event(&mut self) -> Result<Option<Event>, TlvError> {
        let offset = self.position;

        let mut header_bytes = [0u8; RECORD_HEADER_SIZE];
        let got = read_up_to(&mut self.inner, &mut header_bytes)?;
        if got == 0 {
            return Ok(None);
        }
        if got < RECORD_HEADER_SIZE {
            return self.truncated(offset, RECORD_HEADER_SIZE, got);
        }

        let header = RecordHeader::from_bytes(&header_bytes, offset)?;

        let mut value = vec![0u8; header.len as usize];
        let got = read_up_to(&mut self.inner, &mut value)?;
        if got < value.len() {
            return self.truncated(
                offset,
                RECORD_HEADER_SIZE + value.len(),
                RECORD_HEADER_SIZE + got,
            );
        }

        let event = decode_value(header.kind, &value, offset)?;
        self.position += (RECORD_HEADER_SIZE + value.len()) as u64;
        Ok(Some(event))
    }

    /// Reads every remaining event into a log.
    pub fn read_all(&mut self) -> Result<Log, TlvError> {
        let mut events = Vec::new();
        while let Some(event) = self.read_event()? {
            events.push(event);
        }
        Ok(Log::new(events))
    }

    fn truncated(
        &self,
        offset: u64,
        needed: usize,
        available: usize,
    ) -> Result<Option<Event>, TlvError> {
        if self.mode == ReadMode::Permissive {
            tracing::warn!(offset, needed, available, "dropping truncated trailing record");
            return Ok(None);
        }
        Err(TlvError::Truncated {
            offset,
            needed,
            available,
        })
    }
}

/// Fills `buf` as far as the source allows, returning the byte count.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, TlvError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
