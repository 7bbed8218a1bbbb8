use super::*;
use crate::models::range::LineRange;

fn record(at: usize) -> HistoryRecord {
    HistoryRecord::new(
        vec![Command::Delete {
            range: LineRange::point(at),
            force: false,
        }],
        PathBuf::from("/root.zkb"),
    )
}

#[test]
fn test_push_and_pop_lifo() {
    let mut history = History::default();
    assert!(!history.can_undo());

    history.push(record(1));
    history.push(record(2));

    assert_eq!(history.pop_undo(), Some(record(2)));
    assert_eq!(history.pop_undo(), Some(record(1)));
    assert_eq!(history.pop_undo(), None);
}

#[test]
fn test_new_mutation_clears_redo() {
    let mut history = History::default();
    history.push_redo(record(1));
    assert!(history.can_redo());

    history.push(record(2));
    assert!(!history.can_redo());
    assert_eq!(history.undo_len(), 1);
}

#[test]
fn test_push_undo_keeps_redo() {
    let mut history = History::default();
    history.push_redo(record(1));
    history.push_undo(record(2));
    assert!(history.can_redo());
    assert_eq!(history.pop_redo(), Some(record(1)));
}

#[test]
fn test_limit_drops_oldest() {
    let mut history = History::new(2);
    history.push(record(1));
    history.push(record(2));
    history.push(record(3));

    assert_eq!(history.undo_len(), 2);
    let log: Vec<_> = history.log().cloned().collect();
    assert_eq!(log, vec![record(3), record(2)]);
}

#[test]
fn test_empty_records_are_ignored() {
    let mut history = History::default();
    history.push(HistoryRecord::new(Vec::new(), PathBuf::from("/x")));
    history.push_redo(HistoryRecord::new(Vec::new(), PathBuf::from("/x")));
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn test_clear() {
    let mut history = History::default();
    history.push(record(1));
    history.push_redo(record(2));
    history.clear();
    assert_eq!(history.undo_len(), 0);
    assert_eq!(history.redo_len(), 0);
}
