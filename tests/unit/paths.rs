use super::*;

#[test]
fn test_get_log_dir() {
    if let Some(dir) = get_log_dir() {
        assert!(dir.to_string_lossy().contains(APP_NAME));
        assert!(dir.ends_with(LOG_DIR));
    }
}

#[test]
fn test_ensure_log_dir_exists() {
    let dir = ensure_log_dir().unwrap();
    assert!(dir.is_dir());
}

#[test]
fn test_state_files_live_under_hidden_dir() {
    let root = Path::new("/work/outline.zkb");

    assert_eq!(state_dir(root), root.join(".zkb"));
    assert_eq!(settings_path(root), root.join(".zkb").join("settings.json"));
    assert_eq!(journal_path(root), root.join(".zkb").join("journal"));
    assert_eq!(lock_path(root), root.join(".zkb").join("lock"));
}
