//! Engine Module
//!
//! The database facade that coordinates all components.
//!
//! ## Responsibilities
//! - Create or reopen the backing file, reorganizing inherited segments
//! - Route writes into the Active Buffer and flush it at capacity
//! - Trigger compaction when the segment ceiling is reached
//! - Resolve reads through the buffer, then the on-disk segments

use std::path::Path;

use tracing::{debug, info, warn};

use crate::buffer::ActiveBuffer;
use crate::compaction::{self, CapacityController, MergeOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::lookup;
use crate::storage::{validate_record, Entry, Segment, SegmentFile};

/// An open database
///
/// ## Concurrency Model
/// Single-threaded. Every operation, reads included, takes `&mut self`
/// because it positions the shared file cursor. Opening the same file
/// through two handles at once is not supported.
///
/// ## Resource Model
/// The file handle is owned for the lifetime of the value. `close` flushes,
/// syncs and reports errors; dropping without `close` makes a best-effort
/// flush and only logs failures.
pub struct Database {
    /// Database configuration
    config: Config,

    /// Backing file (header + segments)
    file: SegmentFile,

    /// Writes not yet sealed into a segment
    buffer: ActiveBuffer,

    /// Records-per-segment policy
    capacity: CapacityController,

    /// Set once `close` has run, so drop does not flush again
    closed: bool,
}

/// Snapshot of database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    pub capacity: u32,
    pub segment_count: usize,
    pub pair_count: usize,
    pub buffered: usize,
    pub file_size: u64,
}

/// Layout of one on-disk segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSummary {
    /// Offset of the first payload byte
    pub start: u64,
    /// Encoded size, trailer included
    pub byte_len: u64,
    pub records: usize,
    pub tombstones: usize,
}

impl Database {
    /// Open or create a database at `path` with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().path(path.as_ref()).build();
        Self::open_with_config(config)
    }

    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Create the file with a capacity header if it is new
    /// 2. Otherwise read the capacity and reorganize inherited segments
    pub fn open_with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let mut file = SegmentFile::open(&config.path, config.sync_strategy)?;
        let fresh = file.is_empty()?;

        let current = if fresh {
            file.write_header(config.initial_capacity)?;
            config.initial_capacity
        } else {
            file.read_header()?
        };

        let capacity =
            CapacityController::new(current, config.initial_capacity, config.max_segments);

        let mut db = Self {
            config,
            file,
            buffer: ActiveBuffer::new(),
            capacity,
            closed: false,
        };

        if fresh {
            debug!(path = %db.config.path.display(), capacity = current, "created database file");
        } else {
            debug!(path = %db.config.path.display(), capacity = current, "reopening database file");
            db.reorganize()?;
        }

        Ok(db)
    }

    /// Get a value by key
    ///
    /// Search order:
    /// 1. Active Buffer (newest writes)
    /// 2. Segments (newest to oldest)
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        lookup::get(&self.buffer, &mut self.file, key)
    }

    /// Put a key-value pair
    ///
    /// Steps:
    /// 1. Validate reserved bytes (if enabled)
    /// 2. Write to the Active Buffer
    /// 3. Flush the buffer if it reached capacity
    /// 4. Compact if the segment ceiling was reached
    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        if self.config.validate_records {
            validate_record(key, value)?;
        }
        self.write(key, Entry::from_raw(value.to_string()))
    }

    /// Delete a key (writes a tombstone)
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.config.validate_records {
            validate_record(key, "")?;
        }
        self.write(key, Entry::Tombstone)
    }

    fn write(&mut self, key: &str, entry: Entry) -> Result<()> {
        let buffered = self.buffer.insert(key.to_string(), entry);

        if buffered >= self.capacity.current() as usize {
            self.flush_buffer()?;
        }

        let segments = self.segment_count()?;
        if self.capacity.should_compact(segments) {
            let capacity = self.capacity.double();
            info!(
                segments,
                ceiling = self.capacity.ceiling(),
                capacity,
                "segment ceiling reached, compacting"
            );
            self.compact()?;
        }

        Ok(())
    }

    /// Seal the Active Buffer into a new segment (no-op if empty)
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.flush_buffer()
    }

    fn flush_buffer(&mut self) -> Result<()> {
        let encoded = Segment::encode(self.buffer.iter());
        let start = self.file.append_segment(&encoded)?;
        debug!(
            records = self.buffer.len(),
            bytes = encoded.len(),
            start,
            "flushed buffer to segment"
        );
        self.buffer.clear();
        Ok(())
    }

    /// Recompute capacity from the live pair count and merge everything
    pub fn reorganize(&mut self) -> Result<()> {
        let pairs = self.pair_count()?;
        let capacity = self.capacity.recompute(pairs);
        info!(pairs, capacity, "reorganizing segments");
        self.compact().map(|_| ())
    }

    fn compact(&mut self) -> Result<MergeOutcome> {
        let outcome = compaction::merge(&mut self.file, &mut self.buffer, self.capacity.current())?;
        info!(
            segments = outcome.segments_written,
            pairs = outcome.pairs_written,
            capacity = self.capacity.current(),
            "compaction finished"
        );
        Ok(outcome)
    }

    /// Number of segments, counting a non-empty buffer as one
    pub fn segment_count(&mut self) -> Result<usize> {
        let on_disk = self.file.segment_count()?;
        Ok(on_disk + usize::from(!self.buffer.is_empty()))
    }

    /// Number of distinct keys with a live value
    pub fn pair_count(&mut self) -> Result<usize> {
        compaction::count_live_pairs(&self.buffer, &mut self.file)
    }

    /// Close the database gracefully
    ///
    /// Flushes the buffer and syncs the file to disk
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.flush()?;
        self.file.sync()
    }

    // =========================================================================
    // Accessors (for tooling and tests)
    // =========================================================================

    /// Current records-per-segment capacity
    pub fn capacity(&self) -> u32 {
        self.capacity.current()
    }

    /// Entries waiting in the Active Buffer
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gather capacity, counts and file size
    pub fn stats(&mut self) -> Result<DbStats> {
        Ok(DbStats {
            capacity: self.capacity(),
            segment_count: self.segment_count()?,
            pair_count: self.pair_count()?,
            buffered: self.buffered_len(),
            file_size: self.file.len()?,
        })
    }

    /// Describe each on-disk segment, newest first
    pub fn segment_summaries(&mut self) -> Result<Vec<SegmentSummary>> {
        let mut summaries = Vec::new();
        for raw in self.file.iter_newest_first()? {
            let raw = raw?;
            let segment = raw.decode()?;
            summaries.push(SegmentSummary {
                start: raw.start,
                byte_len: raw.byte_len(),
                records: segment.len(),
                tombstones: segment.tombstone_count(),
            });
        }
        Ok(summaries)
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush().and_then(|_| self.file.sync()) {
            warn!(path = %self.config.path.display(), error = %e, "flush on drop failed");
        }
    }
}
