//! Active Buffer implementation
//!
//! BTreeMap-based sorted buffer.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::storage::{Entry, Record, SegmentKey};

/// In-memory table for writes that are not yet durable
///
/// Keys iterate in UTF-16 code unit order, matching segment order.
#[derive(Debug, Default, Clone)]
pub struct ActiveBuffer {
    entries: BTreeMap<SegmentKey, Entry>,
}

impl ActiveBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry; returns the new entry count
    pub fn insert(&mut self, key: String, entry: Entry) -> usize {
        self.entries.insert(SegmentKey::from(key), entry);
        self.entries.len()
    }

    /// Put a live value
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> usize {
        self.insert(key.into(), Entry::Value(value.into()))
    }

    /// Record a tombstone for `key`
    pub fn delete(&mut self, key: impl Into<String>) -> usize {
        self.insert(key.into(), Entry::Tombstone)
    }

    /// Entry for `key`, tombstones included
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(&SegmentKey::from(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&SegmentKey::from(key))
    }

    /// Number of entries (tombstones included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry (after a flush or compaction made them durable)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> btree_map::Iter<'_, SegmentKey, Entry> {
        self.entries.iter()
    }

    /// Owned copy of the contents, in key order
    pub fn snapshot(&self) -> Vec<Record> {
        self.entries
            .iter()
            .map(|(k, e)| Record::new(k.as_str(), e.clone()))
            .collect()
    }
}
