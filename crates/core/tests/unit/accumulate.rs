//! # Accumulation Tests
//!
//! Dot products over every summation order, matrix/vector products and the
//! element-wise matrix scale.

use fpcases_core::case::Matrix;
use fpcases_core::interval::{EvaluationMode, Interval};
use fpcases_core::{ErrorKind, Precision};
use proptest::prelude::*;

use crate::common::{exact_engine, f32_const, f32_runtime, f32v};

fn identity() -> Matrix {
    Matrix::from_columns(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()
}

/// 2 columns × 3 rows.
fn two_by_three() -> Matrix {
    Matrix::from_columns(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
}

// ──────────────────────────────────────────────────────────
// Matrix products
// ──────────────────────────────────────────────────────────

#[test]
fn test_identity_product_is_widened_by_accumulation() {
    let result = f32_runtime().matrix_vector(&identity(), &[3.5, -2.25]).unwrap();
    assert_eq!(result.len(), 2);
    let first = result.get(0).unwrap();
    let second = result.get(1).unwrap();
    assert!(first.contains(3.5));
    assert!(second.contains(-2.25));
    for component in result.components() {
        let width = component.width().unwrap();
        assert!(width > 0.0 && width <= 2f64.powi(-20), "{component}");
    }
}

#[test]
fn test_identity_product_is_exact_without_widening() {
    let engine = exact_engine(Precision::F32, EvaluationMode::NonConst);
    let result = engine.matrix_vector(&identity(), &[3.5, -2.25]).unwrap();
    assert_eq!(result.components(), &[Interval::point(3.5), Interval::point(-2.25)]);
}

#[test]
fn test_matrix_vector_uses_rows() {
    let engine = exact_engine(Precision::F32, EvaluationMode::Const);
    let result = engine.matrix_vector(&two_by_three(), &[1.0, 10.0]).unwrap();
    assert_eq!(
        result.components(),
        &[Interval::point(41.0), Interval::point(52.0), Interval::point(63.0)]
    );
}

#[test]
fn test_vector_matrix_uses_columns() {
    let engine = exact_engine(Precision::F32, EvaluationMode::Const);
    let result = engine.vector_matrix(&[1.0, 1.0, 1.0], &two_by_three()).unwrap();
    assert_eq!(result.components(), &[Interval::point(6.0), Interval::point(15.0)]);
}

#[test]
fn test_mismatched_dimensions_are_rejected() {
    let engine = f32_const();
    let err = engine.matrix_vector(&two_by_three(), &[1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractViolation);
    assert_eq!(
        err.to_string(),
        "dimension mismatch: cannot multiply mat2x3 by vec3"
    );
    let err = engine.vector_matrix(&[1.0, 2.0], &two_by_three()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "dimension mismatch: cannot multiply vec2 by mat2x3"
    );
}

#[test]
fn test_matrix_scalar_is_element_wise() {
    let matrix = Matrix::from_columns(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let result = f32_const().matrix_scalar(&matrix, 0.5);
    assert_eq!((result.cols(), result.rows()), (2, 2));
    assert_eq!(result.get(1, 0), Some(&Interval::point(1.5)));
    assert_eq!(result.get(0, 1), Some(&Interval::point(1.0)));
    assert_eq!(result.get(2, 0), None);
}

// ──────────────────────────────────────────────────────────
// Dot products
// ──────────────────────────────────────────────────────────

#[test]
fn test_dot_rejects_unsupported_lengths() {
    let engine = f32_const();
    let err = engine.dot(&[], &[]).unwrap_err();
    assert!(err.to_string().starts_with("malformed shape"));
    let long = vec![1.0; 17];
    assert!(engine.dot(&long, &long).is_err());
    assert!(engine.dot(&[1.0, 2.0], &[1.0]).is_err());
}

#[test]
fn test_dot_covers_every_order_exhaustively() {
    // Left to right: every small term is absorbed by 1 (ties to even).
    // Small terms first: 3 * 2^-24 rounds 1 up to 1 + 2^-22.
    let engine = exact_engine(Precision::F32, EvaluationMode::Const);
    let tiny = 2f64.powi(-24);
    let sum = engine.dot(&[1.0, tiny, tiny, tiny], &[1.0; 4]).unwrap();
    assert!(sum.contains(1.0));
    assert!(sum.contains(1.0 + 2f64.powi(-22)));
}

#[test]
fn test_dot_covers_every_order_by_subsets() {
    let engine = exact_engine(Precision::F32, EvaluationMode::Const);
    let tiny = 2f64.powi(-24);
    let sum = engine.dot(&[1.0, tiny, tiny, tiny, tiny], &[1.0; 5]).unwrap();
    assert!(sum.contains(1.0));
    assert!(sum.contains(1.0 + 2f64.powi(-22)));
    assert!(sum.high().unwrap() < 1.0 + 2f64.powi(-20));
}

#[test]
fn test_sum_all_orders_edge_cases() {
    let engine = f32_const();
    assert_eq!(engine.sum_all_orders(&[]), Interval::point(0.0));
    let single = Interval::new(1.0, 2.0);
    assert_eq!(engine.sum_all_orders(&[single]), single);
}

#[test]
fn test_long_sums_are_bounded_without_enumeration() {
    let sum = f32_runtime().sum_all_orders(&vec![Interval::point(1.0); 64]);
    assert!(sum.contains(64.0), "{sum}");
    assert!(sum.width().unwrap() < 2f64.powi(-6), "{sum}");

    let engine = exact_engine(Precision::F32, EvaluationMode::Const);
    let sum = engine.dot(&[1.0; 16], &[0.5; 16]).unwrap();
    assert!(sum.contains(8.0) && sum.is_finite(), "{sum}");
    assert!(sum.width().unwrap() < 2f64.powi(-12), "{sum}");
}

#[test]
fn test_long_sums_with_infinite_terms_admit_anything() {
    let mut terms = vec![Interval::point(1.0); 16];
    terms.push(Interval::new(0.0, f64::INFINITY));
    assert!(f32_const().sum_all_orders(&terms).is_any());
}

#[test]
fn test_long_sums_near_overflow_admit_anything() {
    let terms = vec![Interval::point(f64::from(f32::MAX) / 4.0); 9];
    assert!(f32_const().sum_all_orders(&terms).is_any());
}

#[test]
fn test_dot_with_infinite_terms_of_opposite_sign() {
    let sum = f32_const()
        .dot(&[f64::INFINITY, f64::NEG_INFINITY], &[1.0, 1.0])
        .unwrap();
    assert!(sum.accepts_nan());
}

proptest! {
    #[test]
    fn prop_sequential_orders_are_accepted(
        terms in prop::collection::vec((-1000.0_f32..1000.0, -1000.0_f32..1000.0), 2..=5),
    ) {
        let (lhs, rhs): (Vec<f32>, Vec<f32>) = terms.into_iter().unzip();
        let products: Vec<f32> = lhs.iter().zip(&rhs).map(|(a, b)| a * b).collect();
        let forward = products.iter().fold(0.0_f32, |acc, &p| acc + p);
        let reverse = products.iter().rev().fold(0.0_f32, |acc, &p| acc + p);

        let lhs: Vec<f64> = lhs.into_iter().map(f32v).collect();
        let rhs: Vec<f64> = rhs.into_iter().map(f32v).collect();
        for engine in [f32_runtime(), exact_engine(Precision::F32, EvaluationMode::NonConst)] {
            let sum = engine.dot(&lhs, &rhs).unwrap();
            prop_assert!(sum.contains(f32v(forward)), "{sum} misses {forward}");
            prop_assert!(sum.contains(f32v(reverse)), "{sum} misses {reverse}");
        }
    }

    #[test]
    fn prop_random_pairing_trees_are_accepted(
        terms in prop::collection::vec((-1000.0_f32..1000.0, -1000.0_f32..1000.0), 2..=6),
        choices in prop::collection::vec(any::<usize>(), 12),
    ) {
        let (lhs, rhs): (Vec<f32>, Vec<f32>) = terms.into_iter().unzip();
        let total = tree_sum(&lhs, &rhs, &choices);
        let lhs: Vec<f64> = lhs.into_iter().map(f32v).collect();
        let rhs: Vec<f64> = rhs.into_iter().map(f32v).collect();
        for engine in [f32_runtime(), exact_engine(Precision::F32, EvaluationMode::NonConst)] {
            let sum = engine.dot(&lhs, &rhs).unwrap();
            prop_assert!(sum.contains(f32v(total)), "{sum} misses {total}");
        }
    }

    #[test]
    fn prop_long_pairing_trees_are_accepted(
        terms in prop::collection::vec((-1000.0_f32..1000.0, -1000.0_f32..1000.0), 9..=16),
        choices in prop::collection::vec(any::<usize>(), 32),
    ) {
        let (lhs, rhs): (Vec<f32>, Vec<f32>) = terms.into_iter().unzip();
        let total = tree_sum(&lhs, &rhs, &choices);
        let lhs: Vec<f64> = lhs.into_iter().map(f32v).collect();
        let rhs: Vec<f64> = rhs.into_iter().map(f32v).collect();
        for engine in [f32_runtime(), exact_engine(Precision::F32, EvaluationMode::NonConst)] {
            let sum = engine.dot(&lhs, &rhs).unwrap();
            prop_assert!(sum.contains(f32v(total)), "{sum} misses {total}");
        }
    }
}

/// Native `f32` dot product summed along the tree picked by `choices`: each
/// step removes two pending partial sums and pushes their rounded sum.
fn tree_sum(lhs: &[f32], rhs: &[f32], choices: &[usize]) -> f32 {
    let mut pending: Vec<f32> = lhs.iter().zip(rhs).map(|(a, b)| a * b).collect();
    let mut picks = choices.iter().copied().cycle();
    while pending.len() > 1 {
        let first = pending.swap_remove(picks.next().unwrap_or(0) % pending.len());
        let second = pending.swap_remove(picks.next().unwrap_or(0) % pending.len());
        pending.push(first + second);
    }
    pending[0]
}
