//! Segment Codec
//!
//! Converts sorted record batches to and from the on-disk segment text.
//!
//! Keys and values must not contain the unit separator, the record separator
//! or the tombstone byte. `validate_record` checks this; the codec itself does
//! not, and a violating record silently corrupts parsing of its segment.

use std::cmp::Ordering;
use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, SegKvError};

use super::{RECORD_SEPARATOR, TOMBSTONE, TRAILER_SIZE, UNIT_SEPARATOR};

/// Order two keys by UTF-16 code unit, the order segments are stored in
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Owned key ordered by UTF-16 code unit
///
/// Differs from `String` ordering when a supplementary-plane character
/// meets one in U+E000..=U+FFFF.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SegmentKey(String);

impl SegmentKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Ord for SegmentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(&self.0, &other.0)
    }
}

impl PartialOrd for SegmentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AsRef<str> for SegmentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SegmentKey {
    fn from(key: String) -> Self {
        SegmentKey(key)
    }
}

impl From<&str> for SegmentKey {
    fn from(key: &str) -> Self {
        SegmentKey(key.to_string())
    }
}

impl fmt::Debug for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Value side of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A live value
    Value(String),

    /// A tombstone (deleted key)
    Tombstone,
}

impl Entry {
    /// Classify raw value text: anything carrying the tombstone byte is deleted
    pub fn from_raw(raw: String) -> Self {
        if raw.contains(TOMBSTONE) {
            Entry::Tombstone
        } else {
            Entry::Value(raw)
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Entry::Tombstone)
    }

    /// Live value, if any
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Entry::Value(v) => Some(v),
            Entry::Tombstone => None,
        }
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            Entry::Value(v) => Some(v),
            Entry::Tombstone => None,
        }
    }

    fn put_raw(&self, buf: &mut BytesMut) {
        match self {
            Entry::Value(v) => put_text(buf, v),
            Entry::Tombstone => put_char(buf, TOMBSTONE),
        }
    }
}

/// A key with its entry, as stored inside a segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub entry: Entry,
}

impl Record {
    pub fn new(key: impl Into<String>, entry: Entry) -> Self {
        Self {
            key: key.into(),
            entry,
        }
    }
}

/// A decoded segment: records in strictly ascending key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    records: Vec<Record>,
}

impl Segment {
    /// Encode records (already sorted by `compare_keys`) into payload + trailer.
    pub fn encode<'a, K, I>(records: I) -> Bytes
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, &'a Entry)>,
    {
        let mut buf = BytesMut::new();
        for (i, (key, entry)) in records.into_iter().enumerate() {
            if i > 0 {
                put_char(&mut buf, RECORD_SEPARATOR);
            }
            put_text(&mut buf, key.as_ref());
            put_char(&mut buf, UNIT_SEPARATOR);
            entry.put_raw(&mut buf);
        }

        let total = buf.len() as u64 + TRAILER_SIZE;
        buf.put_i64(total as i64);
        buf.freeze()
    }

    /// Encode a slice of records
    pub fn encode_records(records: &[Record]) -> Bytes {
        Self::encode(records.iter().map(|r| (r.key.as_str(), &r.entry)))
    }

    /// Decode a payload (trailer excluded).
    ///
    /// Never sorts; a payload whose keys are not strictly ascending is corrupt.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.is_empty() {
            return Ok(Self::default());
        }
        if payload.len() % 2 != 0 {
            return Err(SegKvError::corrupt(format!(
                "payload length {} is not a whole number of UTF-16 units",
                payload.len()
            )));
        }

        let mut reader = payload;
        let mut units = Vec::with_capacity(payload.len() / 2);
        while reader.has_remaining() {
            units.push(reader.get_u16());
        }
        let text = String::from_utf16(&units)
            .map_err(|_| SegKvError::corrupt("payload is not valid UTF-16"))?;

        let mut records: Vec<Record> = Vec::new();
        for part in text.split(RECORD_SEPARATOR) {
            let (key, value) = part.split_once(UNIT_SEPARATOR).ok_or_else(|| {
                SegKvError::corrupt(format!("record {} has no key/value separator", records.len()))
            })?;

            if let Some(prev) = records.last() {
                if compare_keys(&prev.key, key) != Ordering::Less {
                    return Err(SegKvError::corrupt(format!(
                        "keys out of order: {:?} followed by {:?}",
                        prev.key, key
                    )));
                }
            }

            records.push(Record::new(key, Entry::from_raw(value.to_string())));
        }

        Ok(Self { records })
    }

    /// Binary search for `key`
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.records
            .binary_search_by(|r| compare_keys(&r.key, key))
            .ok()
            .map(|i| &self.records[i].entry)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tombstone_count(&self) -> usize {
        self.records.iter().filter(|r| r.entry.is_tombstone()).count()
    }
}

/// Reject text that would break segment parsing
pub fn validate_record(key: &str, value: &str) -> Result<()> {
    check_text("key", key)?;
    check_text("value", value)
}

fn check_text(what: &str, text: &str) -> Result<()> {
    for reserved in [UNIT_SEPARATOR, RECORD_SEPARATOR, TOMBSTONE] {
        if text.contains(reserved) {
            return Err(SegKvError::InvalidRecord(format!(
                "{} contains reserved byte {:#04x}",
                what, reserved as u32
            )));
        }
    }
    Ok(())
}

fn put_text(buf: &mut BytesMut, text: &str) {
    for unit in text.encode_utf16() {
        buf.put_u16(unit);
    }
}

fn put_char(buf: &mut BytesMut, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        buf.put_u16(*unit);
    }
}
