use super::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn open(names: &[&str]) -> (TempDir, Session) {
    let dir = tempdir().unwrap();
    let root = dir.path().join("demo.zkb");
    fs::create_dir(&root).unwrap();
    for name in names {
        fs::create_dir(root.join(name)).unwrap();
    }
    let session = Session::open(&root).unwrap();
    (dir, session)
}

fn labels(session: &mut Session) -> Vec<String> {
    session
        .entries()
        .unwrap()
        .into_iter()
        .map(|e| e.label.to_string())
        .collect()
}

#[test]
fn test_open_requires_directory() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        Session::open(&dir.path().join("missing.zkb")),
        Err(StoreError::RootNotFound(_))
    ));
}

#[test]
fn test_second_session_is_locked_out() {
    let (_dir, session) = open(&[]);
    assert!(matches!(
        Session::open(session.root()),
        Err(StoreError::Locked(_))
    ));
}

#[test]
fn test_insert_follows_cursor() {
    let (_dir, mut session) = open(&[]);

    session.insert(Some("a"), None).unwrap();
    session.insert(Some("b"), None).unwrap();
    session.insert(None, None).unwrap();

    assert_eq!(labels(&mut session), vec!["a", "b", "'...'"]);
    assert_eq!(session.cursor(), 4);
}

#[test]
fn test_insert_at_cursor_position() {
    let (_dir, mut session) = open(&["1 a", "2 c"]);

    session.set_cursor(2).unwrap();
    session.insert(Some("b"), None).unwrap();

    assert_eq!(labels(&mut session), vec!["a", "b", "c"]);
    assert_eq!(session.cursor(), 3);
}

#[test]
fn test_set_cursor_bounds() {
    let (_dir, mut session) = open(&["1 a"]);

    session.set_cursor(2).unwrap();
    assert!(matches!(
        session.set_cursor(3),
        Err(StoreError::NonExistentLine { line: 3, count: 1 })
    ));
    assert!(session.set_cursor(0).is_err());
}

#[test]
fn test_delete_defaults_to_last_line_at_append() {
    let (_dir, mut session) = open(&["1 a", "2 b"]);

    session.set_cursor(3).unwrap();
    let removed = session.delete(None, false).unwrap();

    assert_eq!(removed[0].label, "b");
    assert_eq!(labels(&mut session), vec!["a"]);
    assert_eq!(session.cursor(), 2);
}

#[test]
fn test_delete_on_empty_container() {
    let (_dir, mut session) = open(&[]);
    assert!(matches!(
        session.delete(None, false),
        Err(StoreError::NonExistentLine { count: 0, .. })
    ));
}

#[test]
fn test_undo_and_redo_insert() {
    let (_dir, mut session) = open(&["1 a"]);

    session.insert(Some("b"), Some(1)).unwrap();
    assert_eq!(labels(&mut session), vec!["b", "a"]);

    session.undo().unwrap();
    assert_eq!(labels(&mut session), vec!["a"]);

    session.redo().unwrap();
    assert_eq!(labels(&mut session), vec!["b", "a"]);

    session.undo().unwrap();
    assert!(matches!(session.undo(), Err(StoreError::NoHistory)));
}

#[test]
fn test_new_mutation_clears_redo() {
    let (_dir, mut session) = open(&[]);

    session.insert(Some("a"), None).unwrap();
    session.undo().unwrap();
    session.insert(Some("b"), None).unwrap();

    assert!(matches!(session.redo(), Err(StoreError::NoRedo)));
}

#[test]
fn test_undo_range_delete_is_one_step() {
    let (_dir, mut session) = open(&["1 a", "2 b", "3 c", "4 d"]);

    session.delete(Some(LineRange::new(2, 3)), false).unwrap();
    assert_eq!(labels(&mut session), vec!["a", "d"]);

    session.undo().unwrap();
    assert_eq!(labels(&mut session), vec!["a", "b", "c", "d"]);
    assert!(!session.history().can_undo());
}

#[test]
fn test_undo_forced_delete_restores_top_level_only() {
    let (dir, mut session) = open(&["1 main", "2 end"]);
    fs::create_dir(dir.path().join("demo.zkb/1 main/1 body")).unwrap();

    session.delete(Some(LineRange::point(1)), true).unwrap();
    session.undo().unwrap();

    assert_eq!(labels(&mut session), vec!["main", "end"]);
    assert_eq!(session.info(1).unwrap().children, 0);
}

#[test]
fn test_undo_rename_with_mixed_labels() {
    let (_dir, mut session) = open(&["1 a", "2 b", "3 c"]);

    session
        .rename(&LabelSource::Text("z".into()), Some(LineRange::new(1, 3)))
        .unwrap();
    assert_eq!(labels(&mut session), vec!["z", "z", "z"]);

    session.undo().unwrap();
    assert_eq!(labels(&mut session), vec!["a", "b", "c"]);

    session.redo().unwrap();
    assert_eq!(labels(&mut session), vec!["z", "z", "z"]);
}

#[test]
fn test_rename_to_same_label_records_nothing() {
    let (_dir, mut session) = open(&["1 a"]);

    session
        .rename(&LabelSource::Text("a".into()), Some(LineRange::point(1)))
        .unwrap();
    assert!(!session.history().can_undo());
}

#[test]
fn test_undo_move_and_swap() {
    let (_dir, mut session) = open(&["1 a", "2 b", "3 c", "4 d"]);

    session.move_lines(LineRange::point(1), 3, false).unwrap();
    assert_eq!(labels(&mut session), vec!["b", "c", "a", "d"]);
    session.swap(1, 4).unwrap();
    assert_eq!(labels(&mut session), vec!["d", "c", "a", "b"]);

    session.undo().unwrap();
    assert_eq!(labels(&mut session), vec!["b", "c", "a", "d"]);
    session.undo().unwrap();
    assert_eq!(labels(&mut session), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_extended_move_undo_and_redo() {
    let (_dir, mut session) = open(&["1 a", "2 b"]);

    let outcome = session.move_lines(LineRange::point(1), 4, false).unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::NeedsConfirmation {
            count: 2,
            required: 4
        }
    );
    assert!(!session.history().can_undo());

    session.move_lines(LineRange::point(1), 4, true).unwrap();
    assert_eq!(labels(&mut session), vec!["b", "'...'", "'...'", "a"]);

    session.undo().unwrap();
    assert_eq!(labels(&mut session), vec!["a", "b"]);

    session.redo().unwrap();
    assert_eq!(labels(&mut session), vec!["b", "'...'", "'...'", "a"]);
}

#[test]
fn test_enter_leave_and_breadcrumb() {
    let (dir, mut session) = open(&["1 main()", "2 end"]);
    fs::create_dir(dir.path().join("demo.zkb/1 main()/1 print")).unwrap();

    session.set_cursor(2).unwrap();
    session.enter(1).unwrap();
    assert_eq!(session.cursor(), 1);
    assert_eq!(labels(&mut session), vec!["print"]);
    assert_eq!(session.breadcrumb(), vec!["demo.zkb", "main()"]);

    assert!(session.leave());
    assert_eq!(session.active(), session.root());
    assert!(!session.leave());
    assert!(session.enter(5).is_err());
}

#[test]
fn test_undo_runs_in_recorded_container() {
    let (_dir, mut session) = open(&["1 main()"]);

    session.enter(1).unwrap();
    session.insert(Some("body"), None).unwrap();
    session.leave();

    session.undo().unwrap();
    assert_eq!(session.active(), session.root());
    assert_eq!(session.info(1).unwrap().children, 0);
}

#[test]
fn test_active_container_renamed_by_undo() {
    let (_dir, mut session) = open(&["1 a", "2 b"]);

    session.swap(1, 2).unwrap();
    session.enter(1).unwrap();
    session.undo().unwrap();

    assert_eq!(session.active(), session.root());
    assert_eq!(labels(&mut session), vec!["a", "b"]);
}

#[test]
fn test_failed_undo_keeps_record() {
    let (dir, mut session) = open(&[]);

    session.insert(Some("a"), None).unwrap();
    fs::create_dir(dir.path().join("demo.zkb/1 a/1 child")).unwrap();

    assert!(matches!(session.undo(), Err(StoreError::NotEmpty { line: 1 })));
    assert!(session.history().can_undo());
    assert_eq!(labels(&mut session), vec!["a"]);
}

#[test]
fn test_history_limit_from_settings() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("demo.zkb");
    fs::create_dir(&root).unwrap();
    let settings = Settings {
        history_limit: 2,
        ..Settings::default()
    };
    let mut session =
        Session::with_provider(&root, settings, Arc::new(LocalFileProvider::new())).unwrap();

    for label in ["a", "b", "c"] {
        session.insert(Some(label), None).unwrap();
    }
    assert_eq!(session.history().undo_len(), 2);
}

#[test]
fn test_entries_in_range() {
    let (_dir, mut session) = open(&["1 a", "2 b", "3 c"]);

    let entries = session.entries_in_range(LineRange::new(2, 3)).unwrap();
    let keys: Vec<usize> = entries.iter().map(|e| e.key).collect();
    assert_eq!(keys, vec![2, 3]);

    assert!(matches!(
        session.entries_in_range(LineRange::new(2, 4)),
        Err(StoreError::InvalidRange { .. })
    ));
}

#[test]
fn test_move_to_unreachable_line_is_an_error() {
    let (_dir, mut session) = open(&["1 a", "2 b"]);

    let result = session.move_lines(LineRange::new(1, 2), usize::MAX, true);
    assert!(matches!(result, Err(StoreError::NonExistentLine { .. })));
    assert_eq!(labels(&mut session), vec!["a", "b"]);
    assert!(!session.history().can_undo());
}
