use super::*;

#[test]
fn undo_then_redo_round_trips() {
    let mut h = History::new(0, 10);
    h.record(1);
    h.record(2);
    assert_eq!(h.undo(), Some(&1));
    assert_eq!(h.redo(), Some(&2));
    assert_eq!(*h.present(), 2);
}

#[test]
fn undo_and_redo_are_noops_at_the_ends() {
    let mut h = History::new("a", 10);
    assert_eq!(h.undo(), None);
    assert_eq!(h.redo(), None);
    assert_eq!(*h.present(), "a");
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn new_record_discards_redo_branch() {
    let mut h = History::new(0, 10);
    h.record(1);
    h.record(2);
    h.undo();
    h.undo();
    assert_eq!(h.len_future(), 2);
    h.record(9);
    assert_eq!(h.len_future(), 0);
    assert_eq!(h.redo(), None);
    assert_eq!(*h.present(), 9);
    assert_eq!(h.undo(), Some(&0));
}

#[test]
fn capacity_evicts_oldest_first() {
    let mut h = History::new(0, 3);
    for v in 1..=10 {
        h.record(v);
        assert!(h.len_past() <= 3);
    }
    assert_eq!(h.undo(), Some(&9));
    assert_eq!(h.undo(), Some(&8));
    assert_eq!(h.undo(), Some(&7));
    assert_eq!(h.undo(), None);
    assert_eq!(*h.present(), 7);
}

#[test]
fn redo_respects_capacity() {
    let mut h = History::new(0, 2);
    h.record(1);
    h.record(2);
    h.undo();
    h.undo();
    h.redo();
    h.redo();
    assert_eq!(h.len_past(), 2);
    assert_eq!(*h.present(), 2);
}

#[test]
fn zero_capacity_keeps_only_the_present() {
    let mut h = History::new(0, 0);
    h.record(1);
    assert!(!h.can_undo());
    assert_eq!(*h.present(), 1);
}

#[test]
fn default_capacity_is_fifty() {
    let mut h = History::new(0u32, DEFAULT_HISTORY_CAPACITY);
    for v in 1..=80 {
        h.record(v);
    }
    assert_eq!(h.len_past(), 50);
    let mut last = 0;
    let mut steps = 0;
    while let Some(v) = h.undo() {
        last = *v;
        steps += 1;
    }
    assert_eq!(last, 30);
    assert_eq!(steps, 50);
    // 50 undone snapshots plus the one now present.
    assert_eq!(h.len_future() + 1, 51);
}
