//! Tests for ActiveBuffer
//!
//! These tests verify:
//! - Basic put/get/delete operations
//! - Tombstones are kept as entries
//! - Sorted iteration for segment encoding
//! - Clearing after flush

use segkv::buffer::ActiveBuffer;
use segkv::storage::{Entry, Record, Segment, TRAILER_SIZE};

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_buffer_is_empty() {
    let buffer = ActiveBuffer::new();
    assert!(buffer.is_empty());
    assert_eq!(buffer.len(), 0);
    assert!(buffer.get("anything").is_none());
}

#[test]
fn test_put_get() {
    let mut buffer = ActiveBuffer::new();
    buffer.put("hello", "world");

    assert_eq!(buffer.get("hello"), Some(&Entry::Value("world".into())));
    assert!(buffer.contains("hello"));
    assert!(!buffer.contains("world"));
}

#[test]
fn test_len_counts_distinct_keys() {
    let mut buffer = ActiveBuffer::new();
    assert_eq!(buffer.put("a", "1"), 1);
    assert_eq!(buffer.put("b", "2"), 2);
    assert_eq!(buffer.put("a", "3"), 2);
    assert_eq!(buffer.delete("c"), 3);
}

#[test]
fn test_delete_then_put_revives() {
    let mut buffer = ActiveBuffer::new();
    buffer.delete("k");
    buffer.put("k", "back");
    assert_eq!(buffer.get("k"), Some(&Entry::Value("back".into())));
}

#[test]
fn test_clear() {
    let mut buffer = ActiveBuffer::new();
    buffer.put("a", "1");
    buffer.delete("b");

    buffer.clear();

    assert!(buffer.is_empty());
    assert!(!buffer.contains("a"));
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_iter_sorted_regardless_of_insert_order() {
    let mut buffer = ActiveBuffer::new();
    for key in ["delta", "alpha", "charlie", "bravo"] {
        buffer.put(key, key.to_uppercase());
    }

    let keys: Vec<&str> = buffer.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["alpha", "bravo", "charlie", "delta"]);
}

#[test]
fn test_snapshot_encodes_to_valid_segment() {
    let mut buffer = ActiveBuffer::new();
    buffer.put("z", "26");
    buffer.put("m", "13");
    buffer.delete("a");

    let snapshot = buffer.snapshot();
    assert_eq!(
        snapshot,
        vec![
            Record::new("a", Entry::Tombstone),
            Record::new("m", Entry::Value("13".into())),
            Record::new("z", Entry::Value("26".into())),
        ]
    );

    let encoded = Segment::encode(buffer.iter());
    let payload = &encoded[..encoded.len() - TRAILER_SIZE as usize];
    let segment = Segment::decode(payload).unwrap();
    assert_eq!(segment.records(), snapshot.as_slice());
}
