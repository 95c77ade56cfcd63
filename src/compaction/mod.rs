//! Compaction Module
//!
//! Rewrites the whole file into a bounded number of capacity-limited
//! segments, dropping shadowed records and tombstones.
//!
//! ## Resolution Order
//! Every key is decided once, at its newest occurrence: the Active Buffer
//! first, then segments from the physical end of file back to the header.
//! Tombstones count as a decision, so an older live value behind a delete
//! is never carried into the output. `merge` and `count_live_pairs` share
//! this walk and therefore always agree.

mod bucket;
pub mod capacity;

use std::collections::HashSet;

use tracing::debug;

use crate::buffer::ActiveBuffer;
use crate::error::Result;
use crate::storage::{Entry, SegmentFile};

pub use bucket::BucketSet;
pub use capacity::CapacityController;

/// Result of a merge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Segments in the rewritten file
    pub segments_written: usize,
    /// Live records in the rewritten file
    pub pairs_written: usize,
}

/// Rebalance buffer + on-disk records into segments of `capacity` records.
///
/// Clears the buffer on success. No-op when there is nothing to merge.
pub fn merge(
    file: &mut SegmentFile,
    buffer: &mut ActiveBuffer,
    capacity: u32,
) -> Result<MergeOutcome> {
    if !file.has_segments()? && buffer.is_empty() {
        return Ok(MergeOutcome::default());
    }

    let mut buckets = BucketSet::new(capacity as usize);
    walk_newest_first(buffer, file, |key, entry| {
        if let Entry::Value(value) = entry {
            buckets.push(key, value);
        }
    })?;

    let pairs_written = buckets.record_count();
    let segments = buckets.into_segments();
    file.truncate_and_rewrite(capacity, &segments)?;
    buffer.clear();

    debug!(
        capacity,
        segments = segments.len(),
        pairs = pairs_written,
        "rewrote database file"
    );

    Ok(MergeOutcome {
        segments_written: segments.len(),
        pairs_written,
    })
}

/// Number of distinct keys whose newest occurrence is live
pub fn count_live_pairs(buffer: &ActiveBuffer, file: &mut SegmentFile) -> Result<usize> {
    let mut live = 0;
    walk_newest_first(buffer, file, |_, entry| {
        if !entry.is_tombstone() {
            live += 1;
        }
    })?;
    Ok(live)
}

/// Visit each key exactly once, with its newest entry
fn walk_newest_first<F>(buffer: &ActiveBuffer, file: &mut SegmentFile, mut visit: F) -> Result<()>
where
    F: FnMut(String, Entry),
{
    let mut resolved: HashSet<String> = buffer
        .iter()
        .map(|(k, _)| k.as_str().to_string())
        .collect();
    for (key, entry) in buffer.iter() {
        visit(key.as_str().to_string(), entry.clone());
    }

    if !file.has_segments()? {
        return Ok(());
    }

    for raw in file.iter_newest_first()? {
        let segment = raw?.decode()?;
        for record in segment.into_records() {
            if resolved.contains(&record.key) {
                continue;
            }
            resolved.insert(record.key.clone());
            visit(record.key, record.entry);
        }
    }

    Ok(())
}
