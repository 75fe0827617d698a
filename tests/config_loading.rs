// tests/config_loading.rs

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use stashwatch::config::{load_and_validate, load_from_path, load_or_default};
use stashwatch::errors::StashwatchError;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Stashwatch.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn full_config_is_loaded() {
    let (_dir, path) = write_config(
        r#"
repositories = ["/src/app", "/src/lib"]

[git]
binary = "/usr/local/bin/git"
timeout = "1500ms"
encoding = "utf-8"

[debug]
exec = true
"#,
    );

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.repositories, vec![PathBuf::from("/src/app"), PathBuf::from("/src/lib")]);
    assert_eq!(cfg.git.binary, "/usr/local/bin/git");
    assert_eq!(cfg.git.timeout, Some(Duration::from_millis(1500)));
    assert_eq!(cfg.git.encoding.as_deref(), Some("utf-8"));
    assert!(cfg.debug.exec);
}

#[test]
fn every_section_is_optional() {
    let (_dir, path) = write_config("");
    let cfg = load_and_validate(&path).unwrap();
    assert!(cfg.repositories.is_empty());
    assert_eq!(cfg.git.binary, "git");
    assert_eq!(cfg.git.timeout, None);
    assert!(!cfg.debug.exec);
}

#[test]
fn unknown_keys_are_rejected() {
    let (_dir, path) = write_config("[git]\nbinnary = \"git\"\n");
    assert!(matches!(load_from_path(&path), Err(StashwatchError::TomlError(_))));
}

#[test]
fn invalid_timeout_is_a_config_error() {
    let (_dir, path) = write_config("[git]\ntimeout = \"forever\"\n");
    match load_and_validate(&path) {
        Err(StashwatchError::ConfigError(msg)) => assert!(msg.contains("timeout"), "{msg}"),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn missing_file_errors_unless_defaults_are_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(load_and_validate(&path), Err(StashwatchError::IoError(_))));

    let cfg = load_or_default(&path).unwrap();
    assert_eq!(cfg.git.binary, "git");
    assert!(cfg.repositories.is_empty());
}
