//! # Configuration Tests

use std::io::Write;

use fpcases_core::config::{Accumulation, CatalogConfig, Config};
use fpcases_core::{ErrorKind, Precision};
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.range.normal_count, 50);
    assert_eq!(config.range.subnormal_count, 10);
    assert_eq!(config.engine.accumulation, Accumulation::Widened);
    assert!(config.engine.flush_subnormals);
    assert_eq!(config.catalog.dimensions, vec![2, 3, 4]);
    assert_eq!(config.catalog, CatalogConfig::default());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = Config::from_json(
        r#"{ "engine": { "flush_subnormals": false }, "catalog": { "precisions": ["f16"] } }"#,
    )
    .unwrap();
    assert!(!config.engine.flush_subnormals);
    assert_eq!(config.engine.accumulation, Accumulation::Widened);
    assert_eq!(config.catalog.precisions, vec![Precision::F16]);
    assert_eq!(config.catalog.dimensions, vec![2, 3, 4]);
    assert_eq!(config.range.normal_count, 50);
}

#[test]
fn test_empty_object_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.range, Config::default().range);
    assert_eq!(config.engine, Config::default().engine);
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "range": {{ "normal_count": 6, "subnormal_count": 1 }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.range.normal_count, 6);
    assert_eq!(config.range.subnormal_count, 1);
}

#[test]
fn test_invalid_input_is_a_config_error() {
    let err = Config::from_json(r#"{ "engine": { "accumulation": "Sloppy" } }"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().starts_with("invalid configuration"));

    let err = Config::from_json(r#"{ "catalog": { "precisions": ["f64"] } }"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = Config::from_file("/nonexistent/fpcases.json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().starts_with("cannot read configuration"));
}
