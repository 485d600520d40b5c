//! Append-only TLV log writer.

use crate::codec::encode_event;
use crate::errors::TlvError;
use crate::event::{Event, Log};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Options for log writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
    /// Whether to append to an existing file (default: true); `false` truncates it.
    pub append: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
            append: true,
        }
    }
}

/// Appends events to a TLV log file as they are captured.
///
/// Each event is written as one complete record, so a crash loses at most
/// the record being written; [`ReadMode::Permissive`](crate::ReadMode)
/// recovers everything before it.
///
/// # Example
///
/// ```rust,no_run
/// use hav_log::{Event, LogWriter, WriteOptions};
///
/// let mut writer = LogWriter::open("session.havl", WriteOptions::default())?;
/// writer.append_event(&Event::KeyDown { key: "H".into(), time: 1_700_000_000_000 })?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LogWriter {
    file: File,
    sync: bool,
}

impl LogWriter {
    /// Opens or creates a log file for writing.
    ///
    /// # Errors
    ///
    /// Returns [`TlvError::Io`] if the file cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, TlvError> {
        let mut open = OpenOptions::new();
        open.create(options.create);
        if options.append {
            open.append(true);
        } else {
            open.write(true).truncate(true);
        }
        let file = open.open(path)?;

        Ok(Self {
            file,
            sync: options.sync,
        })
    }

    /// Appends one event as a single record.
    ///
    /// # Errors
    ///
    /// Returns [`TlvError`] if the event cannot be encoded or an I/O error occurs.
    pub fn append_event(&mut self, event: &Event) -> Result<(), TlvError> {
        let mut record = Vec::new();
        encode_event(event, &mut record)?;
        self.file.write_all(&record)?;
        self.file.flush()?;

        if self.sync {
            self.file.sync_all()?;
        }

        Ok(())
    }

    /// Appends every event of `log` in order.
    pub fn append_log(&mut self, log: &Log) -> Result<(), TlvError> {
        for event in log {
            self.append_event(event)?;
        }
        Ok(())
    }

    /// Finishes writing and closes the file.
    pub fn finish(mut self) -> Result<(), TlvError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}
