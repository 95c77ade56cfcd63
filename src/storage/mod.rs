//! Storage Module
//!
//! Single-file, append-only segment log.
//!
//! ## Responsibilities
//! - Encode sorted record batches as self-describing segments
//! - Append segments at end of file
//! - Walk segments backward (newest → oldest) via their trailers
//! - Rewrite the whole file during compaction
//!
//! ## File Format
//! All integers are big-endian.
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ Header (4 bytes)                                       │
//! │   Capacity: i32 (records per segment)                  │
//! ├────────────────────────────────────────────────────────┤
//! │ Segment 1 (oldest)                                     │
//! │   Payload: UTF-16BE text                               │
//! │     key 0x1F value 0x1E key 0x1F value ...             │
//! │   Trailer: i64 = payload length + 8                    │
//! ├────────────────────────────────────────────────────────┤
//! │ ... Segment N (newest, physically last)                │
//! └────────────────────────────────────────────────────────┘
//! ```
//! A value containing 0x1A is a tombstone.

mod codec;
mod file;
mod iterator;

pub use codec::{compare_keys, validate_record, Entry, Record, Segment, SegmentKey};
pub use file::SegmentFile;
pub use iterator::{RawSegment, SegmentIter};

// =============================================================================
// Shared Constants (used by codec, file, iterator)
// =============================================================================

/// Header size: Capacity (4) = 4 bytes
pub const HEADER_SIZE: u64 = 4;

/// Trailer size: segment length (8) = 8 bytes
pub const TRAILER_SIZE: u64 = 8;

/// Separates a key from its value
pub const UNIT_SEPARATOR: char = '\u{1F}';

/// Separates consecutive records
pub const RECORD_SEPARATOR: char = '\u{1E}';

/// Marks a value as deleted wherever it appears
pub const TOMBSTONE: char = '\u{1A}';
