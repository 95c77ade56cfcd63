//! Segment File
//!
//! Owns the database file: header, appends, full rewrites and backward reads.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::SyncStrategy;
use crate::error::{Result, SegKvError};

use super::iterator::SegmentIter;
use super::{HEADER_SIZE, TRAILER_SIZE};

/// The single backing file of a database
///
/// All access is positioned explicitly (seek then read/write); the cursor
/// position is never relied on between calls.
pub struct SegmentFile {
    /// Path to the database file
    path: PathBuf,
    /// File handle, exclusively owned
    file: File,
    /// When to sync writes to disk
    sync_strategy: SyncStrategy,
}

impl SegmentFile {
    /// Open the file, creating an empty one if absent
    ///
    /// Does not touch the header; see `write_header` / `read_header`.
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sync_strategy,
        })
    }

    /// Current file length in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// True if the file holds nothing, not even a header
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// True if at least one segment follows the header
    pub fn has_segments(&self) -> Result<bool> {
        Ok(self.len()? > HEADER_SIZE)
    }

    // =========================================================================
    // Header
    // =========================================================================

    /// Read the per-segment capacity stored at offset 0
    pub fn read_header(&mut self) -> Result<u32> {
        let len = self.len()?;
        if len < HEADER_SIZE {
            return Err(SegKvError::corrupt(format!(
                "file is {} bytes, shorter than the {}-byte header",
                len, HEADER_SIZE
            )));
        }

        self.file.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; HEADER_SIZE as usize];
        self.file.read_exact(&mut header)?;

        let capacity = i32::from_be_bytes(header);
        if capacity <= 0 {
            return Err(SegKvError::corrupt(format!(
                "header holds non-positive capacity {}",
                capacity
            )));
        }
        Ok(capacity as u32)
    }

    /// Overwrite the header in place
    pub fn write_header(&mut self, capacity: u32) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header_bytes(capacity))?;
        self.maybe_sync()
    }

    // =========================================================================
    // Segments
    // =========================================================================

    /// Append an encoded segment (payload + trailer) at end of file.
    ///
    /// Returns the offset the segment starts at.
    pub fn append_segment(&mut self, encoded: &[u8]) -> Result<u64> {
        let start = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(encoded)?;
        self.maybe_sync()?;
        Ok(start)
    }

    /// Start offset of the segment whose trailer ends at `offset`
    ///
    /// Reads only the trailer.
    pub fn segment_start(&mut self, offset: u64) -> Result<u64> {
        if offset < HEADER_SIZE + TRAILER_SIZE {
            return Err(SegKvError::corrupt(format!(
                "no room for a trailer before offset {}",
                offset
            )));
        }

        self.file.seek(SeekFrom::Start(offset - TRAILER_SIZE))?;
        let mut trailer = [0u8; TRAILER_SIZE as usize];
        self.file.read_exact(&mut trailer)?;

        let total = i64::from_be_bytes(trailer);
        if total < TRAILER_SIZE as i64 {
            return Err(SegKvError::corrupt(format!(
                "trailer before offset {} holds invalid length {}",
                offset, total
            )));
        }

        offset
            .checked_sub(total as u64)
            .filter(|start| *start >= HEADER_SIZE)
            .ok_or_else(|| {
                SegKvError::corrupt(format!(
                    "segment of {} bytes ending at {} would start inside the header",
                    total, offset
                ))
            })
    }

    /// Read the segment ending at `offset`: returns (payload, start_offset)
    pub fn read_segment_ending_at(&mut self, offset: u64) -> Result<(Vec<u8>, u64)> {
        let start = self.segment_start(offset)?;
        let payload_len = offset - TRAILER_SIZE - start;

        self.file.seek(SeekFrom::Start(start))?;
        let mut payload = vec![0u8; payload_len as usize];
        self.file.read_exact(&mut payload)?;

        Ok((payload, start))
    }

    /// Replace the whole file: header, then `segments` oldest first
    ///
    /// Not crash-safe: a failure part way leaves the file inconsistent.
    pub fn truncate_and_rewrite(&mut self, capacity: u32, segments: &[Bytes]) -> Result<()> {
        let total: usize = segments.iter().map(|s| s.len()).sum();
        let mut buf = BytesMut::with_capacity(HEADER_SIZE as usize + total);
        buf.put_slice(&header_bytes(capacity));
        for segment in segments {
            buf.put_slice(segment);
        }

        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&buf)?;
        self.maybe_sync()
    }

    /// Number of on-disk segments, counted by hopping trailers
    pub fn segment_count(&mut self) -> Result<usize> {
        let mut end = self.len()?;
        let mut count = 0;
        while end > HEADER_SIZE {
            end = self.segment_start(end)?;
            count += 1;
        }
        Ok(count)
    }

    /// Iterate segments from the physical end of file back to the header
    pub fn iter_newest_first(&mut self) -> Result<SegmentIter<'_>> {
        let end = self.len()?;
        Ok(SegmentIter::new(self, end))
    }

    // =========================================================================
    // Durability
    // =========================================================================

    /// Force file contents and metadata to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn maybe_sync(&mut self) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn header_bytes(capacity: u32) -> [u8; HEADER_SIZE as usize] {
    (capacity.min(i32::MAX as u32) as i32).to_be_bytes()
}
