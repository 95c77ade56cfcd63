//! Lookup Module
//!
//! Point lookups: Active Buffer first, then segments newest → oldest.

use tracing::trace;

use crate::buffer::ActiveBuffer;
use crate::error::Result;
use crate::storage::{Entry, SegmentFile};

/// Resolve `key` to its live value
///
/// Returns:
/// - `Ok(Some(value))`: newest occurrence is live
/// - `Ok(None)`: key never written, or newest occurrence is a tombstone
pub fn get(buffer: &ActiveBuffer, file: &mut SegmentFile, key: &str) -> Result<Option<String>> {
    // The buffer is the newest generation: any entry here is final
    if let Some(entry) = buffer.get(key) {
        return Ok(entry.as_value().map(str::to_string));
    }

    Ok(find_on_disk(file, key)?.and_then(Entry::into_value))
}

/// Newest on-disk entry for `key`, tombstones included
pub fn find_on_disk(file: &mut SegmentFile, key: &str) -> Result<Option<Entry>> {
    if !file.has_segments()? {
        return Ok(None);
    }

    for (hop, raw) in file.iter_newest_first()?.enumerate() {
        let raw = raw?;
        let segment = raw.decode()?;
        trace!(hop, start = raw.start, records = segment.len(), "searching segment");

        if let Some(entry) = segment.find(key) {
            return Ok(Some(entry.clone()));
        }
    }

    Ok(None)
}
