//! Configuration for segkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SegKvError};

/// Maximum number of segments (Active Buffer included) before compaction
pub const SEGMENT_MAX_COUNT: usize = 8;

/// Per-segment capacity of a freshly created database file
pub const SEGMENT_MAX_CAPACITY_START: u32 = 1024;

/// Main configuration for a segkv database
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single database file. Created on first open.
    pub path: PathBuf,

    /// Sync strategy: when to call `sync_data` on the database file
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Segment Configuration
    // -------------------------------------------------------------------------
    /// Records per segment for a new file, and the lower bound
    /// used whenever capacity is recomputed
    pub initial_capacity: u32,

    /// Segment ceiling; reaching it during `put` triggers compaction
    pub max_segments: usize,

    /// Reject keys and values that contain reserved bytes
    pub validate_records: bool,
}

/// File sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// sync after every header, segment, or rewrite (safest, slowest)
    EveryWrite,

    /// sync only when the database is closed
    OnClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./segkv.db"),
            sync_strategy: SyncStrategy::EveryWrite,
            initial_capacity: SEGMENT_MAX_CAPACITY_START,
            max_segments: SEGMENT_MAX_COUNT,
            validate_records: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the segment parameters
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(SegKvError::Config(
                "initial_capacity must be at least 1".to_string(),
            ));
        }
        if self.initial_capacity > i32::MAX as u32 {
            return Err(SegKvError::Config(format!(
                "initial_capacity {} does not fit the 4-byte header",
                self.initial_capacity
            )));
        }
        if self.max_segments < 2 {
            return Err(SegKvError::Config(format!(
                "max_segments must be at least 2, got {}",
                self.max_segments
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the starting (and minimum) per-segment capacity
    pub fn initial_capacity(mut self, capacity: u32) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the segment ceiling
    pub fn max_segments(mut self, count: usize) -> Self {
        self.config.max_segments = count;
        self
    }

    /// Enable or disable reserved-byte validation on `put`
    pub fn validate_records(mut self, enabled: bool) -> Self {
        self.config.validate_records = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
