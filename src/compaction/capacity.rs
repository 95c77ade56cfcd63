//! Capacity Controller
//!
//! Tracks records-per-segment and its growth-only policy.

/// Largest capacity the 4-byte signed header can hold
pub const MAX_CAPACITY: u32 = i32::MAX as u32;

/// Per-segment capacity, persisted in the file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityController {
    current: u32,
    /// Lower bound applied on every recompute
    floor: u32,
    /// Segment ceiling that triggers compaction
    max_segments: usize,
}

impl CapacityController {
    pub fn new(current: u32, floor: u32, max_segments: usize) -> Self {
        Self {
            current,
            floor,
            max_segments,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn ceiling(&self) -> usize {
        self.max_segments
    }

    /// True once `segment_count` has reached the ceiling
    pub fn should_compact(&self, segment_count: usize) -> bool {
        segment_count >= self.ceiling()
    }

    /// Double the capacity (ceiling hit during `put`)
    pub fn double(&mut self) -> u32 {
        self.current = self.current.saturating_mul(2).min(MAX_CAPACITY);
        self.current
    }

    /// Size segments so `live_pairs` fills about half the segment slots.
    ///
    /// `max(ceil(live_pairs / (max_segments / 2)), floor)`, and never below
    /// the current value.
    pub fn recompute(&mut self, live_pairs: usize) -> u32 {
        let half_slots = self.max_segments as u64;
        let target = (2 * live_pairs as u64).div_ceil(half_slots);
        let target = target.min(MAX_CAPACITY as u64) as u32;

        self.current = self.current.max(target).max(self.floor);
        self.current
    }
}
