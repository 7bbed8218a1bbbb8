use super::*;

#[test]
fn test_starts_at_first_line() {
    let cursor = Cursor::new();
    assert_eq!(cursor.line(), 1);
    assert!(cursor.is_append(0));
    assert!(!cursor.is_append(3));
}

#[test]
fn test_set_accepts_append_position() {
    let mut cursor = Cursor::new();
    cursor.set(4, 3).unwrap();
    assert_eq!(cursor.line(), 4);
    assert!(cursor.is_append(3));
}

#[test]
fn test_set_rejects_out_of_bounds() {
    let mut cursor = Cursor::new();
    assert!(matches!(
        cursor.set(0, 3),
        Err(StoreError::NonExistentLine { line: 0, count: 3 })
    ));
    assert!(matches!(
        cursor.set(5, 3),
        Err(StoreError::NonExistentLine { line: 5, count: 3 })
    ));
    assert_eq!(cursor.line(), 1);
}

#[test]
fn test_clamp_pulls_back_after_shrink() {
    let mut cursor = Cursor::new();
    cursor.set(9, 10).unwrap();
    cursor.clamp(4);
    assert_eq!(cursor.line(), 5);
    cursor.clamp(0);
    assert_eq!(cursor.line(), 1);
}

#[test]
fn test_existing_line_falls_back_to_last() {
    let mut cursor = Cursor::new();
    assert_eq!(cursor.existing_line(0), None);
    assert_eq!(cursor.existing_line(3), Some(1));
    cursor.set(4, 3).unwrap();
    assert_eq!(cursor.existing_line(3), Some(3));
}

#[test]
fn test_after_insert_moves_below() {
    let mut cursor = Cursor::new();
    cursor.after_insert(1, 1);
    assert_eq!(cursor.line(), 2);
    cursor.after_insert(1, 2);
    assert_eq!(cursor.line(), 2);
}
