//! Property tests for Database
//!
//! Random operation sequences are replayed against a BTreeMap model.
//! These tests verify:
//! - Reads return the last written value
//! - Deletes stick across flush and reorganize
//! - The segment ceiling holds after every write
//! - pair_count equals the number of live keys in the model

use std::collections::BTreeMap;

use proptest::prelude::*;
use segkv::config::{Config, SyncStrategy};
use segkv::engine::Database;
use tempfile::TempDir;

// =============================================================================
// Operation Model
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Put(String, String),
    Delete(String),
    Flush,
    Reorganize,
}

fn key_strategy() -> impl Strategy<Value = String> {
    // small key space so overwrites and deletes collide often
    "[a-f]{1,2}"
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (key_strategy(), "[a-z0-9 ]{0,8}").prop_map(|(k, v)| Op::Put(k, v)),
        3 => key_strategy().prop_map(Op::Delete),
        1 => Just(Op::Flush),
        1 => Just(Op::Reorganize),
    ]
}

fn open_small(temp_dir: &TempDir, capacity: u32) -> Database {
    let config = Config::builder()
        .path(temp_dir.path().join("prop.kv"))
        .initial_capacity(capacity)
        .sync_strategy(SyncStrategy::OnClose)
        .build();
    Database::open_with_config(config).unwrap()
}

fn apply(db: &mut Database, model: &mut BTreeMap<String, String>, op: &Op) {
    match op {
        Op::Put(k, v) => {
            db.put(k, v).unwrap();
            model.insert(k.clone(), v.clone());
        }
        Op::Delete(k) => {
            db.delete(k).unwrap();
            model.remove(k);
        }
        Op::Flush => db.flush().unwrap(),
        Op::Reorganize => db.reorganize().unwrap(),
    }
}

fn assert_matches_model(db: &mut Database, model: &BTreeMap<String, String>) {
    for a in 'a'..='f' {
        let mut keys = vec![a.to_string()];
        keys.extend(('a'..='f').map(|b| format!("{}{}", a, b)));
        for key in keys {
            assert_eq!(db.get(&key).unwrap(), model.get(&key).cloned(), "key {:?}", key);
        }
    }
    assert_eq!(db.pair_count().unwrap(), model.len());
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_reads_match_model(
        capacity in 1u32..5,
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let mut db = open_small(&temp_dir, capacity);
        let mut model = BTreeMap::new();

        for op in &ops {
            apply(&mut db, &mut model, op);
            prop_assert!(db.segment_count().unwrap() <= 8);
        }

        assert_matches_model(&mut db, &model);
    }

    #[test]
    fn prop_state_survives_reopen(
        capacity in 1u32..5,
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let mut model = BTreeMap::new();
        {
            let mut db = open_small(&temp_dir, capacity);
            for op in &ops {
                apply(&mut db, &mut model, op);
            }
            db.close().unwrap();
        }

        let mut db = open_small(&temp_dir, capacity);
        assert_matches_model(&mut db, &model);
    }

    #[test]
    fn prop_reorganize_is_idempotent(
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let mut db = open_small(&temp_dir, 2);
        let mut model = BTreeMap::new();
        for op in &ops {
            apply(&mut db, &mut model, op);
        }

        db.reorganize().unwrap();
        let once = std::fs::read(temp_dir.path().join("prop.kv")).unwrap();
        let pairs_once = db.pair_count().unwrap();

        db.reorganize().unwrap();
        let twice = std::fs::read(temp_dir.path().join("prop.kv")).unwrap();

        prop_assert_eq!(db.pair_count().unwrap(), pairs_once);
        prop_assert_eq!(once, twice);
        assert_matches_model(&mut db, &model);
    }
}
