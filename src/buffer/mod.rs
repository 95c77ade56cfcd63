//! Active Buffer Module
//!
//! In-memory staging area for writes not yet sealed into a segment.
//!
//! ## Responsibilities
//! - Hold the newest generation of data (newer than every on-disk segment)
//! - Keep keys sorted so a flush can encode directly
//! - Track entry count for the capacity-based flush trigger
//!
//! ## Data Structure Choice
//! BTreeMap: ordered keys are required for segment generation, and the
//! engine is single-threaded so no locking wrapper is needed.

mod table;

pub use table::ActiveBuffer;
