//! Merge accumulator
//!
//! Output buckets of one merge pass. Each bucket becomes one segment.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::storage::{Entry, Segment, SegmentKey};

/// Capacity-limited output buckets, filled newest data first
///
/// Owned by a single merge invocation. Bucket 0 holds the newest records and
/// ends up physically last in the rewritten file.
#[derive(Debug)]
pub struct BucketSet {
    buckets: Vec<BTreeMap<SegmentKey, Entry>>,
    capacity: usize,
}

impl BucketSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            buckets: vec![BTreeMap::new()],
            capacity: capacity.max(1),
        }
    }

    /// Add a live record to the tail bucket, opening a new tail when full
    pub fn push(&mut self, key: String, value: String) {
        let full = self
            .buckets
            .last()
            .map_or(true, |tail| tail.len() >= self.capacity);
        if full {
            self.buckets.push(BTreeMap::new());
        }
        if let Some(tail) = self.buckets.last_mut() {
            tail.insert(SegmentKey::from(key), Entry::Value(value));
        }
    }

    /// Records across all buckets
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(BTreeMap::len).sum()
    }

    /// Encode non-empty buckets, oldest first (write order)
    pub fn into_segments(self) -> Vec<Bytes> {
        self.buckets
            .into_iter()
            .rev()
            .filter(|bucket| !bucket.is_empty())
            .map(|bucket| Segment::encode(bucket.iter()))
            .collect()
    }
}
