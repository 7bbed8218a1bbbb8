use super::*;
use crate::services::file::LocalFileProvider;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_defaults_when_missing() {
    let dir = tempdir().unwrap();
    let settings = Settings::load(&LocalFileProvider::new(), dir.path());

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.blank_label, "'...'");
    assert_eq!(settings.history_limit, 256);
    assert!(settings.journal);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".zkb")).unwrap();
    fs::write(
        dir.path().join(".zkb").join("settings.json"),
        r#"{ "history_limit": 8 }"#,
    )
    .unwrap();

    let settings = Settings::load(&LocalFileProvider::new(), dir.path());
    assert_eq!(settings.history_limit, 8);
    assert_eq!(settings.blank_label, DEFAULT_BLANK_LABEL);
}

#[test]
fn test_invalid_file_falls_back() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".zkb")).unwrap();
    fs::write(dir.path().join(".zkb").join("settings.json"), "{ nope").unwrap();

    assert_eq!(
        Settings::load(&LocalFileProvider::new(), dir.path()),
        Settings::default()
    );
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let provider = LocalFileProvider::new();
    let settings = Settings {
        blank_label: "todo".to_string(),
        history_limit: 4,
        journal: false,
    };

    settings.save(&provider, dir.path()).unwrap();
    assert_eq!(Settings::load(&provider, dir.path()), settings);
}
