//! Edit-event logs and their canonical TLV encoding.
//!
//! This crate provides:
//! - The [`Event`] sum type and the ordered, immutable [`Log`]
//! - Canonical TLV [`encode`]/[`decode`] with strict decoding
//! - JSON log documents and wire-format detection
//! - Streaming file reader/writer with strict and permissive modes
//!
//! ## Quick Start
//!
//! ```rust
//! use hav_log::{decode, encode, Event, Log};
//!
//! let log = Log::new(vec![
//!     Event::KeyDown { key: "H".into(), time: 1_700_000_000_000 },
//!     Event::Insert { ch: "H".into(), cursor: 0, time: 1_700_000_000_004 },
//! ]);
//!
//! let bytes = encode(&log)?;
//! assert_eq!(decode(&bytes)?, log);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// TLV encode/decode.
pub mod codec;
/// JSON log documents and format detection.
pub mod document;
/// Error types for log operations.
pub mod errors;
/// Event and log types.
pub mod event;
/// Record header and type codes.
pub mod frame;
/// Streaming log reader.
pub mod reader;
/// Append-only log writer.
pub mod writer;

pub use codec::{decode, encode, encode_event, signing_bytes};
pub use document::{parse_log, LogDocument, LogFormat};
pub use errors::TlvError;
pub use event::{Event, Log};
pub use frame::{EventKind, RecordHeader};
pub use reader::{LogReader, ReadMode};
pub use writer::{LogWriter, WriteOptions};
