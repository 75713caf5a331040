use evidex_pipeline::config::{CURRENT_VERSION, PipelineConfig, migrate};
use evidex_pipeline::error::PipelineError;

#[test]
fn defaults_match_documented_values() {
    let config = PipelineConfig::default();
    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.relevance_threshold, 30);
    assert_eq!(config.min_evidence_threshold, 3);
    assert_eq!(config.min_references, 5);
    assert_eq!(config.max_references, 10);
    assert_eq!(config.recent_window_years, 5);
    assert_eq!(config.badge_recent_years, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let config = PipelineConfig::from_json(r#"{"config_version": 1, "max_references": 8}"#).unwrap();
    assert_eq!(config.max_references, 8);
    assert_eq!(config.min_references, 5);
}

#[test]
fn unversioned_config_is_migrated() {
    let config = PipelineConfig::from_json(r#"{"min_sources": 6, "reference_year": 2026}"#).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.min_evidence_threshold, 6);
    assert_eq!(config.current_year(), 2026);

    let raw = serde_json::json!({"min_sources": 4, "min_evidence_threshold": 9});
    let migrated = migrate(raw, 0).unwrap();
    assert_eq!(migrated["min_evidence_threshold"], 9);
    assert!(migrated.get("min_sources").is_none());
}

#[test]
fn newer_config_is_rejected() {
    let err = PipelineConfig::from_json(r#"{"config_version": 99}"#).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
    assert!(migrate(serde_json::json!([1, 2]), 0).is_err());
}

#[test]
fn oversized_version_is_rejected_not_truncated() {
    let err = PipelineConfig::from_json(r#"{"config_version": 4294967297}"#).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn reference_year_is_bounded() {
    let err = PipelineConfig::from_json(r#"{"config_version": 1, "reference_year": 32767}"#).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
    assert!(PipelineConfig::from_json(r#"{"config_version": 1, "reference_year": -5}"#).is_err());
    assert!(PipelineConfig::from_json(r#"{"config_version": 1, "reference_year": 9999}"#).is_ok());
}

#[test]
fn inconsistent_limits_are_rejected() {
    let err = PipelineConfig::from_json(r#"{"config_version": 1, "min_references": 12}"#).unwrap_err();
    assert!(matches!(err, PipelineError::Evidence(_)));
    assert!(PipelineConfig::from_json(r#"{"config_version": 1, "relevance_threshold": 101}"#).is_err());
}

#[test]
fn save_then_load() {
    let dir = std::env::temp_dir().join(format!("evidex-config-{}", uuid::Uuid::new_v4()));
    let path = dir.join("config.json");
    assert_eq!(PipelineConfig::load_or_default(&path).unwrap(), PipelineConfig::default());

    let config = PipelineConfig {
        config_version: 0,
        relevance_threshold: 40,
        reference_year: Some(2025),
        ..PipelineConfig::default()
    };
    config.save(&path).unwrap();

    let loaded = PipelineConfig::load(&path).unwrap();
    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.relevance_threshold, 40);
    assert_eq!(loaded.reference_year, Some(2025));
    assert!(!dir.join("config.json.tmp").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_is_an_io_error() {
    let err = PipelineConfig::load(std::path::Path::new("/nonexistent/evidex/config.json")).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}
