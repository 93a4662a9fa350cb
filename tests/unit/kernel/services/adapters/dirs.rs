use super::*;

#[test]
fn test_get_log_dir() {
    let dir = get_log_dir();
    assert!(dir.is_some());
    let dir = dir.unwrap();
    assert!(dir.to_string_lossy().contains(APP_NAME));
    assert!(dir.ends_with(LOG_DIR));
}

#[test]
fn test_get_config_dir() {
    let dir = get_config_dir();
    assert!(dir.is_some());
    assert!(dir.unwrap().to_string_lossy().contains(APP_NAME));
}
