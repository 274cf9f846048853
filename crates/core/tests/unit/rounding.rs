//! # Rounding and ULP Tests
//!
//! Exact rounding of rationals under the four IEEE directions, overflow
//! policy, ties-to-even and the unit-in-the-last-place definition.

use fpcases_core::format::{BINARY16, BINARY32, BINARY64, RoundingMode, Scalar};
use num_bigint::BigInt;
use num_rational::BigRational;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn exact(value: f64) -> BigRational {
    Scalar::from_f64(value).to_rational().unwrap()
}

fn ratio(numerator: i64, denominator: i64) -> BigRational {
    BigRational::new(BigInt::from(numerator), BigInt::from(denominator))
}

// ──────────────────────────────────────────────────────────
// Directed rounding
// ──────────────────────────────────────────────────────────

#[test]
fn test_one_third_in_all_directions() {
    let third = ratio(1, 3);
    let down = BINARY32.round(&third, RoundingMode::Rdn);
    let up = BINARY32.round(&third, RoundingMode::Rup);
    assert_eq!(up, down + 1);
    assert_eq!(BINARY32.round(&third, RoundingMode::Rtz), down);
    assert_eq!(BINARY32.round(&third, RoundingMode::Rne), u64::from((1.0_f32 / 3.0).to_bits()));

    let minus_third = -third;
    assert_eq!(BINARY32.round(&minus_third, RoundingMode::Rup), down | 0x8000_0000);
    assert_eq!(BINARY32.round(&minus_third, RoundingMode::Rdn), up | 0x8000_0000);
}

#[test]
fn test_ties_to_even() {
    // 1 + 2^-11 lies halfway between 1 and 1 + 2^-10 in f16.
    let tie_low = exact(1.0 + 2f64.powi(-11));
    assert_eq!(BINARY16.round(&tie_low, RoundingMode::Rne), 0x3c00);
    // 1 + 3 * 2^-11 lies halfway between 1 + 2^-10 (odd) and 1 + 2^-9 (even).
    let tie_high = exact(1.0 + 3.0 * 2f64.powi(-11));
    assert_eq!(BINARY16.round(&tie_high, RoundingMode::Rne), 0x3c02);
}

#[rstest]
#[case(RoundingMode::Rne, 0x7c00, 0xfc00)]
#[case(RoundingMode::Rtz, 0x7bff, 0xfbff)]
#[case(RoundingMode::Rdn, 0x7bff, 0xfc00)]
#[case(RoundingMode::Rup, 0x7c00, 0xfbff)]
fn test_overflow_policy(#[case] mode: RoundingMode, #[case] positive: u64, #[case] negative: u64) {
    let huge = exact(1.0e6);
    assert_eq!(BINARY16.round(&huge, mode), positive);
    assert_eq!(BINARY16.round(&-huge, mode), negative);
}

#[test]
fn test_underflow_keeps_sign() {
    let tiny = exact(2f64.powi(-30));
    assert_eq!(BINARY16.round(&tiny, RoundingMode::Rne), 0);
    assert_eq!(BINARY16.round(&tiny, RoundingMode::Rup), 1);
    assert_eq!(BINARY16.round(&-tiny.clone(), RoundingMode::Rne), 0x8000);
    assert_eq!(BINARY16.round(&-tiny, RoundingMode::Rdn), 0x8001);
}

#[test]
fn test_subnormal_carries_into_normal() {
    // Just below the smallest normal; rounding up lands exactly on it.
    let below = exact(2f64.powi(-14) - 2f64.powi(-26));
    assert_eq!(BINARY16.round(&below, RoundingMode::Rup), 0x0400);
    assert_eq!(BINARY16.round(&below, RoundingMode::Rdn), 0x03ff);
}

#[test]
fn test_binary64_rounding_of_wide_rationals() {
    let third = ratio(1, 3);
    let bits = BINARY64.round(&third, RoundingMode::Rne);
    assert_eq!(f64::from_bits(bits), 1.0 / 3.0);
}

// ──────────────────────────────────────────────────────────
// ULP
// ──────────────────────────────────────────────────────────

#[rstest]
#[case(1.5, 2f64.powi(-23))]
#[case(1.0, 2f64.powi(-24))]
#[case(2.0, 2f64.powi(-23))]
#[case(0.0, 2f64.powi(-149))]
#[case(1.0e-40, 2f64.powi(-149))]
#[case(3.4e38, 2f64.powi(104))]
fn test_binary32_ulp(#[case] value: f64, #[case] expected: f64) {
    assert_eq!(BINARY32.ulp(&exact(value)), exact(expected));
}

#[test]
fn test_ulp_beyond_range_uses_largest_gap() {
    let beyond = exact(1.0e39);
    assert_eq!(BINARY32.ulp(&beyond), exact(2f64.powi(104)));
    assert_eq!(BINARY16.ulp(&exact(1.0e6)), exact(32.0));
}

#[test]
fn test_ulp_of_unrepresentable_value_spans_neighbours() {
    // 1 + 2^-30 sits between 1 and 1 + 2^-23.
    assert_eq!(BINARY32.ulp(&exact(1.0 + 2f64.powi(-30))), exact(2f64.powi(-23)));
}

#[test]
fn test_ulp_is_sign_symmetric() {
    assert_eq!(BINARY16.ulp(&exact(-3.0)), BINARY16.ulp(&exact(3.0)));
}
