use super::*;
use tempfile::tempdir;

#[test]
fn test_write_default_settings_creates_parent_and_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(SETTINGS_FILE);

    write_default_settings(&path).unwrap();
    assert!(path.exists());

    let loaded = load_settings_from(&path).unwrap();
    assert_eq!(loaded, SyncConfig::default());
}

#[test]
fn test_existing_settings_are_not_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(&path, r#"{"route_prefix": "/app"}"#).unwrap();

    write_default_settings(&path).unwrap();
    let loaded = load_settings_from(&path).unwrap();
    assert_eq!(loaded.route_prefix, "/app");
    assert_eq!(loaded.body_debounce_ms, 850);
}

#[test]
fn test_invalid_settings_report_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_settings_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
    assert!(err.to_string().starts_with("invalid settings"));
}

#[test]
fn test_missing_settings_report_io_error() {
    let dir = tempdir().unwrap();
    let err = load_settings_from(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Io(_)));
}

#[test]
fn test_settings_path_ends_with_file_name() {
    if let Some(path) = get_settings_path() {
        assert!(path.ends_with(SETTINGS_FILE));
    }
}
