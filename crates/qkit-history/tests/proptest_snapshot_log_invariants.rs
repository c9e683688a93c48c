#![forbid(unsafe_code)]

//! Property tests for [`SnapshotLog`] invariants.
//!
//! Validates:
//! - N pushes then N-1 undos then N-1 redos lands back on the final push,
//!   with `can_undo`/`can_redo` matching cursor bounds at every step.
//! - Random push/undo/redo sequences never break the cursor invariant.
//! - The capacity bound holds after any operation.
//! - Persist/restore round-trips preserve entries and cursor.

use proptest::prelude::*;

use qkit_history::persist::{self, MemoryStore};
use qkit_history::{HistoryConfig, SnapshotLog};

// ============================================================================
// Strategy helpers
// ============================================================================

/// Operations that can be performed on a SnapshotLog.
#[derive(Debug, Clone)]
enum Op {
    Push(String),
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-z]{0,8}".prop_map(Op::Push),
        2 => Just(Op::Undo),
        2 => Just(Op::Redo),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

fn check_bounds(log: &SnapshotLog) -> Result<(), TestCaseError> {
    match log.cursor() {
        Some(c) => {
            prop_assert!(c < log.len());
            prop_assert_eq!(log.can_undo(), c > 0);
            prop_assert_eq!(log.can_redo(), c + 1 < log.len());
        }
        None => {
            prop_assert_eq!(log.len(), 0);
            prop_assert!(!log.can_undo());
            prop_assert!(!log.can_redo());
        }
    }
    Ok(())
}

// ============================================================================
// Invariant 1: undo/redo round-trip law
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_then_redo_round_trips(
        texts in prop::collection::vec("[a-z]{1,8}", 2..40)
    ) {
        let mut log = SnapshotLog::new(HistoryConfig::unlimited());
        for t in &texts {
            log.push(t);
            check_bounds(&log)?;
        }
        let final_text = texts.last().unwrap().clone();

        for expected in texts.iter().rev().skip(1) {
            let restored = log.undo().unwrap();
            prop_assert_eq!(restored.as_ref(), expected.as_str());
            check_bounds(&log)?;
        }
        prop_assert!(log.undo().is_none());

        for expected in texts.iter().skip(1) {
            let restored = log.redo().unwrap();
            prop_assert_eq!(restored.as_ref(), expected.as_str());
            check_bounds(&log)?;
        }
        prop_assert!(log.redo().is_none());
        prop_assert_eq!(log.current().unwrap().as_ref(), final_text.as_str());
    }
}

// ============================================================================
// Invariant 2: random sequences keep cursor and capacity in bounds
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn random_ops_preserve_invariants(
        ops in ops_strategy(60),
        capacity in 1usize..8
    ) {
        let mut log = SnapshotLog::new(HistoryConfig::new(capacity));
        for op in ops {
            match op {
                Op::Push(text) => log.push(&text),
                Op::Undo => {
                    let before = log.cursor();
                    let out = log.undo();
                    // A refused undo must not move the cursor.
                    if out.is_none() {
                        prop_assert_eq!(log.cursor(), before);
                    }
                }
                Op::Redo => {
                    let before = log.cursor();
                    let out = log.redo();
                    if out.is_none() {
                        prop_assert_eq!(log.cursor(), before);
                    }
                }
            }
            prop_assert!(log.len() <= capacity);
            check_bounds(&log)?;
        }
    }
}

// ============================================================================
// Invariant 3: undo returns what the cursor now points at
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_result_matches_current(
        texts in prop::collection::vec("[a-z]{1,6}", 2..20)
    ) {
        let mut log = SnapshotLog::new(HistoryConfig::unlimited());
        for t in &texts {
            log.push(t);
        }
        while let Some(snapshot) = log.undo() {
            prop_assert_eq!(
                snapshot.as_ref(),
                log.current().unwrap().as_ref()
            );
        }
    }
}

// ============================================================================
// Invariant 4: persistence round-trip is lossless
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn persist_round_trip_is_lossless(
        texts in prop::collection::vec("[ -~]{0,20}", 1..20),
        undos in 0usize..20
    ) {
        let mut log = SnapshotLog::default();
        for t in &texts {
            log.push(t);
        }
        for _ in 0..undos {
            log.undo();
        }

        let mut store = MemoryStore::new();
        persist::save_history(&mut store, "h", &log).unwrap();
        let loaded = persist::load_history(&store, "h", HistoryConfig::default())
            .unwrap()
            .unwrap();

        prop_assert_eq!(loaded.len(), log.len());
        prop_assert_eq!(loaded.cursor(), log.cursor());
        let a: Vec<&str> = log.iter().map(|s| s.as_ref()).collect();
        let b: Vec<&str> = loaded.iter().map(|s| s.as_ref()).collect();
        prop_assert_eq!(a, b);
    }
}
