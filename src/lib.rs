//! # segkv
//!
//! An embedded, single-file key-value store with:
//! - Sorted, append-only segments with backward (trailer-linked) traversal
//! - An in-memory Active Buffer flushed at a per-segment capacity
//! - Whole-file compaction that keeps the segment count bounded
//! - Tombstone deletes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Database                             │
//! │            (open / get / put / delete / close)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────────┐
//!          │            │                     │
//!          ▼            ▼                     ▼
//!   ┌─────────────┐ ┌─────────────┐   ┌───────────────┐
//!   │Active Buffer│ │   Lookup    │   │  Compaction   │
//!   │ (BTreeMap)  │ │(newest→old) │   │(merge+capacity)│
//!   └─────────────┘ └──────┬──────┘   └───────┬───────┘
//!                          │                  │
//!                          ▼                  ▼
//!                  ┌────────────────────────────────┐
//!                  │     Storage (SegmentFile)      │
//!                  │  header │ seg 1 │ ... │ seg N  │
//!                  └────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```no_run
//! use segkv::Database;
//!
//! # fn main() -> segkv::Result<()> {
//! let mut db = Database::open("data.kv")?;
//! db.put("a", "1")?;
//! assert_eq!(db.get("a")?, Some("1".to_string()));
//! db.delete("a")?;
//! db.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod buffer;
pub mod lookup;
pub mod compaction;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SegKvError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::{Database, DbStats, SegmentSummary};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of segkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
