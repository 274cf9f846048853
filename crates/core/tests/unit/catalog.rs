//! # Catalog Tests
//!
//! Key formatting, support matrix, registration of the standard tables and
//! the content of a few generated tables.

use fpcases_core::case::Value;
use fpcases_core::catalog::{CaseKey, Operands, OperationKind};
use fpcases_core::config::CatalogConfig;
use fpcases_core::interval::{EvaluationMode, Expectation, Interval, UnaryOp};
use fpcases_core::{CaseCache, Catalog, Config, Error, ErrorKind, Operation, Precision};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::small_config;

fn registered(config: Config) -> (CaseCache, Vec<CaseKey>) {
    let mut cache = CaseCache::new();
    let keys = Catalog::new(config).register_all(&mut cache).unwrap();
    (cache, keys)
}

// ──────────────────────────────────────────────────────────
// Operations and keys
// ──────────────────────────────────────────────────────────

#[test]
fn test_operation_names_round_trip() {
    for operation in Operation::ALL {
        assert_eq!(operation.name().parse::<Operation>().unwrap(), operation);
    }
    let err = "modulo".parse::<Operation>().unwrap_err();
    assert!(matches!(err, Error::UnknownOperation(ref name) if name == "modulo"));
    assert_eq!(Operation::Ceil.kind(), OperationKind::Unary(UnaryOp::Ceil));
}

#[test]
fn test_division_has_no_abstract_tables() {
    assert!(!Operation::Division.supports(Precision::Abstract));
    assert!(Operation::Division.supports(Precision::F16));
    assert!(Operation::Multiplication.supports(Precision::Abstract));
}

#[test]
fn test_abstract_is_const_only() {
    assert_eq!(Catalog::modes(Precision::Abstract), vec![EvaluationMode::Const]);
    assert_eq!(Catalog::modes(Precision::F16), EvaluationMode::ALL.to_vec());
}

#[rstest]
#[case(CaseKey::scalar(Operation::Ceil, Precision::F32, EvaluationMode::Const), "ceil_f32_const")]
#[case(
    CaseKey::scalar(Operation::Negation, Precision::Abstract, EvaluationMode::Const),
    "negation_abstract_const"
)]
#[case(CaseKey::matrix_vector(Precision::F16, 4, 2, EvaluationMode::NonConst), "multiplication_f16_mat4x2_vec4_non_const")]
#[case(CaseKey::vector_matrix(Precision::F32, 4, 2, EvaluationMode::Const), "multiplication_f32_vec2_mat4x2_const")]
#[case(CaseKey::matrix_scalar(Precision::F32, 3, 3, EvaluationMode::Const), "multiplication_f32_mat3x3_scalar_const")]
fn test_key_format(#[case] key: CaseKey, #[case] expected: &str) {
    assert_eq!(key.to_string(), expected);
}

// ──────────────────────────────────────────────────────────
// Registration
// ──────────────────────────────────────────────────────────

#[test]
fn test_register_all_registers_the_standard_keys() {
    let (cache, keys) = registered(Config::default());
    assert_eq!(keys.len(), 179);
    assert_eq!(cache.len(), 179);
    for key in [
        "ceil_f32_const",
        "ceil_f32_non_const",
        "ceil_f16_const",
        "ceil_abstract_const",
        "division_f16_non_const",
        "multiplication_f32_mat2x3_vec2_const",
        "multiplication_f32_vec3_mat2x3_non_const",
        "multiplication_abstract_mat4x4_scalar_const",
    ] {
        assert!(cache.contains(key), "{key} missing");
    }
    assert!(!cache.contains("ceil_abstract_non_const"));
    assert!(!cache.contains("division_abstract_const"));
    assert!(cache.keys().all(|key| !cache.is_evaluated(key)));
}

#[test]
fn test_keys_match_their_structured_form() {
    let (cache, keys) = registered(small_config());
    for key in &keys {
        assert!(cache.contains(&key.to_string()));
        if key.operands != Operands::Scalar {
            assert_eq!(key.operation, Operation::Multiplication);
        }
    }
}

#[test]
fn test_registering_twice_fails() {
    let mut cache = CaseCache::new();
    let catalog = Catalog::new(small_config());
    let _ = catalog.register_all(&mut cache).unwrap();
    let err = catalog.register_all(&mut cache).unwrap_err();
    assert!(matches!(err, Error::DuplicateKey(_)));
}

#[test]
fn test_unsupported_combinations_are_rejected() {
    let catalog = Catalog::new(small_config());
    let mut cache = CaseCache::new();
    let err = catalog
        .register_binary(&mut cache, Operation::Division, Precision::Abstract, EvaluationMode::Const)
        .unwrap_err();
    assert_eq!(err.to_string(), "division is not supported for abstract");
    let err = catalog
        .register_unary(&mut cache, Operation::Ceil, Precision::Abstract, EvaluationMode::NonConst)
        .unwrap_err();
    assert_eq!(err.to_string(), "non_const evaluation is not available for abstract");
    let err = catalog
        .register_unary(&mut cache, Operation::Addition, Precision::F32, EvaluationMode::Const)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractViolation);
    let err = catalog
        .register_matrix_vector(&mut cache, Precision::F32, 5, 2, EvaluationMode::Const)
        .unwrap_err();
    assert!(matches!(err, Error::MalformedShape(_)));
    assert!(cache.is_empty());
}

#[test]
fn test_invalid_dimensions_abort_before_registration() {
    let config = Config {
        catalog: CatalogConfig {
            dimensions: vec![2, 1],
            ..CatalogConfig::default()
        },
        ..small_config()
    };
    let mut cache = CaseCache::new();
    let err = Catalog::new(config).register_all(&mut cache).unwrap_err();
    assert!(matches!(err, Error::MalformedShape(_)));
    assert!(cache.is_empty());
}

#[test]
fn test_catalog_subset_by_precision() {
    let config = Config {
        catalog: CatalogConfig {
            dimensions: vec![2],
            precisions: vec![Precision::Abstract],
        },
        ..small_config()
    };
    let (_, keys) = registered(config);
    // 8 scalar operations and 3 matrix products, const only.
    assert_eq!(keys.len(), 11);
    assert!(keys.iter().all(|key| key.mode == EvaluationMode::Const));
}

// ──────────────────────────────────────────────────────────
// Generated tables
// ──────────────────────────────────────────────────────────

#[test]
fn test_ceil_const_table_starts_with_literals() {
    let (cache, _) = registered(small_config());
    let table = cache.get("ceil_f32_const").unwrap();
    assert_eq!(table.precision(), Precision::F32);
    assert_eq!(table.mode(), EvaluationMode::Const);

    let literal = &table.cases()[3];
    assert_eq!(literal.input, vec![Value::Scalar(1.1)]);
    assert_eq!(literal.expected, Expectation::Interval(Interval::point(2.0)));

    let regression = &table.cases()[10];
    assert_eq!(regression.input, vec![Value::Scalar(2_147_483_648.0)]);
    assert_eq!(regression.expected, Expectation::Interval(Interval::point(2_147_483_648.0)));

    let format = Precision::F32.format();
    assert!(table.iter().all(|case| case.is_finite(format)));
}

#[test]
fn test_runtime_table_keeps_special_values() {
    let (cache, _) = registered(small_config());
    let table = cache.get("floor_f16_non_const").unwrap();
    assert!(table.iter().any(|case| matches!(case.input[0], Value::Scalar(x) if x.is_nan())));
    assert!(table.iter().any(|case| case.input[0] == Value::Scalar(f64::NEG_INFINITY)));
}

#[test]
fn test_sign_tables_use_bit_sets() {
    let (cache, _) = registered(small_config());
    let table = cache.get("abs_f32_const").unwrap();
    assert!(!table.is_empty());
    assert!(table.iter().all(|case| matches!(case.expected, Expectation::BitSet(_))));
}

#[test]
fn test_product_table_sizes() {
    let (cache, _) = registered(small_config());
    let table = cache.get("multiplication_f32_mat2x3_vec2_non_const").unwrap();
    assert_eq!(table.len(), 169);
    let case = &table.cases()[0];
    assert_eq!(case.input[0].shape().to_string(), "mat2x3");
    assert_eq!(case.input[1].shape().to_string(), "vec2");
    assert!(matches!(&case.expected, Expectation::Vector(v) if v.len() == 3));

    let binary = cache.get("addition_f32_non_const").unwrap();
    assert_eq!(binary.len(), 169);
}
