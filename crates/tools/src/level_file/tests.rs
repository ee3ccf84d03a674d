use std::fs;
use std::path::{Path, PathBuf};

use levelgen::{GenerationOptions, generate_level};
use tempfile::tempdir;

use super::*;

fn make_test_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

fn sample_level() -> Level {
    generate_level(&GenerationOptions::seeded(7).with_rooms(4, 4)).unwrap().level
}

#[test]
fn write_then_load_returns_the_same_level() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "mission.json");
    let level = sample_level();

    write_level_file(&path, &level).unwrap();
    let loaded = load_level_file(&path).unwrap();

    assert_eq!(loaded, level);
    assert_eq!(loaded.fingerprint(), level.fingerprint());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn write_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("levels").join("mission.json");
    write_level_file(&path, &sample_level()).unwrap();
    assert!(path.exists());
}

#[test]
fn envelope_records_version_seed_and_digest() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "envelope.json");
    let level = sample_level();
    write_level_file(&path, &level).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["format_version"], 1);
    assert_eq!(raw["seed"], 7);
    assert_eq!(raw["sha256_hex"].as_str().unwrap(), level_sha256_hex(&level));
    assert_eq!(raw["sha256_hex"].as_str().unwrap().len(), 64);
}

#[test]
fn tampered_level_fails_digest_check() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "tampered.json");
    let level = sample_level();
    write_level_file(&path, &level).unwrap();

    let mut raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    raw["level"]["name"] = serde_json::Value::from("Operation Forged Ledger");
    fs::write(&path, serde_json::to_string_pretty(&raw).unwrap()).unwrap();

    let err = load_level_file(&path).unwrap_err();
    assert!(matches!(err, LevelFileError::DigestMismatch { .. }), "got {err}");
}

#[test]
fn future_format_version_is_rejected() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "future.json");
    write_level_file(&path, &sample_level()).unwrap();

    let mut raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    raw["format_version"] = serde_json::Value::from(9);
    fs::write(&path, serde_json::to_string(&raw).unwrap()).unwrap();

    let err = load_level_file(&path).unwrap_err();
    assert!(matches!(err, LevelFileError::UnsupportedVersion { found: 9 }));
}

#[test]
fn truncated_file_reports_json_error() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "truncated.json");
    write_level_file(&path, &sample_level()).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, &content[..content.len() / 2]).unwrap();

    assert!(matches!(load_level_file(&path).unwrap_err(), LevelFileError::Json(_)));
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempdir().unwrap();
    let err = load_level_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LevelFileError::Io(_)));
}
