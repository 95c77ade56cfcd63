//! Segment Iterator
//!
//! Backward traversal over the segments of a file, newest first.

use crate::error::Result;

use super::file::SegmentFile;
use super::{Segment, HEADER_SIZE};

/// One undecoded segment read from disk
#[derive(Debug, Clone)]
pub struct RawSegment {
    /// Offset of the first payload byte
    pub start: u64,
    /// Offset just past the trailer
    pub end: u64,
    /// Payload bytes (trailer excluded)
    pub payload: Vec<u8>,
}

impl RawSegment {
    pub fn decode(&self) -> Result<Segment> {
        Segment::decode(&self.payload)
    }

    /// Encoded size on disk, trailer included
    pub fn byte_len(&self) -> u64 {
        self.end - self.start
    }
}

/// Iterator over segments from the end of file back toward the header
///
/// Stops after the segment that starts right at the header. A corrupt
/// trailer yields one error and then ends the iteration, since later offsets
/// can no longer be trusted.
pub struct SegmentIter<'a> {
    file: &'a mut SegmentFile,
    /// End offset of the next segment to read
    next_end: u64,
}

impl<'a> SegmentIter<'a> {
    pub(super) fn new(file: &'a mut SegmentFile, end: u64) -> Self {
        Self {
            file,
            next_end: end,
        }
    }
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = Result<RawSegment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_end <= HEADER_SIZE {
            return None;
        }

        let end = self.next_end;
        match self.file.read_segment_ending_at(end) {
            Ok((payload, start)) => {
                self.next_end = start;
                Some(Ok(RawSegment {
                    start,
                    end,
                    payload,
                }))
            }
            Err(e) => {
                self.next_end = 0;
                Some(Err(e))
            }
        }
    }
}
