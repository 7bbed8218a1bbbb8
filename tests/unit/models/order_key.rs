use super::*;

#[test]
fn test_parse_splits_on_first_space() {
    let parsed = OrderKey::parse("12 print('a b c')").unwrap();
    assert_eq!(parsed.key, 12);
    assert_eq!(parsed.label, "print('a b c')");
}

#[test]
fn test_parse_keeps_label_spaces_verbatim() {
    let parsed = OrderKey::parse("3  leading and trailing ").unwrap();
    assert_eq!(parsed.key, 3);
    assert_eq!(parsed.label, " leading and trailing ");
}

#[test]
fn test_parse_rejects_missing_digits() {
    assert!(OrderKey::parse("main() [int]").is_err());
    assert!(OrderKey::parse(" label").is_err());
}

#[test]
fn test_parse_rejects_missing_space() {
    assert_eq!(
        OrderKey::parse("42"),
        Err(MalformedName("42".to_string()))
    );
}

#[test]
fn test_parse_rejects_mixed_key_and_zero() {
    assert!(OrderKey::parse("12abc label").is_err());
    assert!(OrderKey::parse("0 label").is_err());
    assert!(OrderKey::parse("-1 label").is_err());
    assert!(OrderKey::parse("03 label").is_err());
}

#[test]
fn test_parse_rejects_overflowing_key() {
    assert!(OrderKey::parse("99999999999999999999999999 label").is_err());
}

#[test]
fn test_format_joins_with_single_space() {
    assert_eq!(format(7, "return 0"), "7 return 0");
    let key = OrderKey::new(2, "root task");
    assert_eq!(key.format(), "2 root task");
    assert_eq!(key.to_string(), "2 root task");
    assert_eq!(OrderKey::parse(&key.format()).unwrap(), key);
}

#[test]
fn test_with_key_keeps_label() {
    let key = OrderKey::new(2, "x").with_key(9);
    assert_eq!(key, OrderKey::new(9, "x"));
}

#[test]
fn test_scratch_names_are_hidden_and_keyed() {
    let scratch = OrderKey::new(2, "same").scratch_name();
    assert_eq!(scratch, ".scratch-2 same");
    assert!(is_scratch_name(&scratch));
    assert!(OrderKey::parse(&scratch).is_err());
    assert_ne!(scratch, OrderKey::new(5, "same").scratch_name());
}

#[test]
fn test_validate_label_rejects_separators() {
    assert!(validate_label("print(x)"));
    assert!(!validate_label(""));
    assert!(!validate_label("a/b"));
    assert!(!validate_label("a\\b"));
}
