//! Compaction tests: merge, live pair counting, capacity policy
