use super::*;

#[test]
fn test_dir_entry_new() {
    let entry = DirEntry::new(PathBuf::from("/test/3 return 0"), true);
    assert_eq!(entry.name, "3 return 0");
    assert!(entry.is_dir);
    assert!(!entry.is_file);
    assert!(!entry.is_hidden());
}

#[test]
fn test_dir_entry_hidden() {
    let entry = DirEntry::new(PathBuf::from("/test/.zkb"), true);
    assert!(entry.is_hidden());
}

#[test]
fn test_file_error_display() {
    let err = FileError::NotFound(PathBuf::from("/test"));
    assert!(err.to_string().contains("/test"));

    let err = FileError::AlreadyExists(PathBuf::from("/test/1 a"));
    assert_eq!(err.to_string(), "Already exists: /test/1 a");
}
