//! Integration tests for CLI config loading.

use qnorm_cli::normalize::input::load_normalize_config;
use qnorm_core::config::{NormalizeConfig, ShortRowPolicy};

// ---------------------------------------------------------------------------
// NormalizeConfig defaults & serialization
// ---------------------------------------------------------------------------

#[test]
fn normalize_config_default_values() {
    let cfg = NormalizeConfig::default();
    assert_eq!(cfg.delimiter, ',');
    assert_eq!(cfg.precision, 6);
    assert_eq!(cfg.short_rows, ShortRowPolicy::Lenient);
}

#[test]
fn normalize_config_serializes_to_json() {
    let json = serde_json::to_string_pretty(&NormalizeConfig::default()).unwrap();
    assert!(json.contains("\"delimiter\""));
    assert!(json.contains("\"precision\""));
    assert!(json.contains("\"lenient\""));
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: NormalizeConfig = serde_json::from_str(r#"{"short_rows": "reject"}"#).unwrap();
    assert_eq!(cfg.short_rows, ShortRowPolicy::Reject);
    assert_eq!(cfg.delimiter, ',');
    assert_eq!(cfg.precision, 6);
}

// ---------------------------------------------------------------------------
// load_normalize_config
// ---------------------------------------------------------------------------

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qnorm.json");
    std::fs::write(&path, r#"{"delimiter": ";", "precision": 3}"#).unwrap();

    let cfg = load_normalize_config(&path).unwrap();
    assert_eq!(cfg.delimiter, ';');
    assert_eq!(cfg.precision, 3);
    assert_eq!(cfg.short_rows, ShortRowPolicy::Lenient);
}

#[test]
fn unknown_policy_in_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qnorm.json");
    std::fs::write(&path, r#"{"short_rows": "skip"}"#).unwrap();

    let err = load_normalize_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn missing_config_file_errors() {
    let err = load_normalize_config("/nonexistent/qnorm.json").unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}
