//! # Format Model Tests
//!
//! Layout constants, decode/encode round trips, classification and the
//! precision selector.

use fpcases_core::format::{
    BINARY16, BINARY32, BINARY64, FloatClass, FloatFormat, Precision, RoundingMode, Scalar,
};
use fpcases_core::ErrorKind;
use proptest::prelude::*;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// Known encodings
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(&BINARY32, 1.0, 0x3f80_0000)]
#[case(&BINARY32, -2.0, 0xc000_0000)]
#[case(&BINARY32, 0.5, 0x3f00_0000)]
#[case(&BINARY16, 1.0, 0x3c00)]
#[case(&BINARY16, -2.0, 0xc000)]
#[case(&BINARY16, 65504.0, 0x7bff)]
#[case(&BINARY64, 1.0, 0x3ff0_0000_0000_0000)]
fn test_known_bit_patterns(#[case] format: &FloatFormat, #[case] value: f64, #[case] bits: u64) {
    assert_eq!(format.from_f64(value, RoundingMode::Rne), bits);
    assert_eq!(format.to_f64(bits), value);
}

#[test]
fn test_limits_binary16() {
    assert_eq!(BINARY16.max_finite(), 65504.0);
    assert_eq!(BINARY16.min_normal(), 2f64.powi(-14));
    assert_eq!(BINARY16.min_subnormal(), 2f64.powi(-24));
    assert_eq!(BINARY16.max_subnormal(), 2f64.powi(-14) - 2f64.powi(-24));
}

#[test]
fn test_limits_binary32() {
    assert_eq!(BINARY32.max_finite(), f64::from(f32::MAX));
    assert_eq!(BINARY32.min_normal(), f64::from(f32::MIN_POSITIVE));
    assert_eq!(BINARY32.min_subnormal(), 2f64.powi(-149));
}

#[test]
fn test_limits_binary64() {
    assert_eq!(BINARY64.max_finite(), f64::MAX);
    assert_eq!(BINARY64.min_normal(), f64::MIN_POSITIVE);
    assert_eq!(BINARY64.min_subnormal(), f64::from_bits(1));
}

// ══════════════════════════════════════════════════════════
// Round trips
// ══════════════════════════════════════════════════════════

#[test]
fn test_binary16_exhaustive_round_trip() {
    for bits in 0..=0xffff_u64 {
        let value = BINARY16.decode(bits);
        if value.is_nan() {
            assert_eq!(BINARY16.classify(bits), FloatClass::Nan);
            continue;
        }
        for mode in RoundingMode::ALL {
            assert_eq!(
                BINARY16.encode(&value, mode),
                bits,
                "f16 {bits:#06x} did not round-trip under {mode:?}"
            );
        }
    }
}

#[test]
fn test_nan_encodes_canonically() {
    assert_eq!(BINARY32.encode(&Scalar::Nan, RoundingMode::Rne), 0x7fc0_0000);
    assert_eq!(BINARY16.encode(&Scalar::Nan, RoundingMode::Rdn), 0x7e00);
    assert_eq!(BINARY32.from_f64(f64::NAN, RoundingMode::Rup), 0x7fc0_0000);
}

#[test]
fn test_zeros_are_distinct_but_numerically_equal() {
    let positive = BINARY32.decode(0);
    let negative = BINARY32.decode(0x8000_0000);
    assert_eq!(negative, Scalar::NegativeZero);
    assert_ne!(positive, negative);
    assert!(positive.numeric_eq(&negative));
    assert_eq!(BINARY32.encode(&negative, RoundingMode::Rne), 0x8000_0000);
    assert_eq!(BINARY32.encode(&positive, RoundingMode::Rne), 0);
}

proptest! {
    #[test]
    fn prop_binary32_round_trip(bits in any::<u32>()) {
        let bits = u64::from(bits);
        let value = BINARY32.decode(bits);
        prop_assume!(!value.is_nan());
        prop_assert_eq!(BINARY32.encode(&value, RoundingMode::Rne), bits);
        prop_assert_eq!(BINARY32.to_f64(bits).to_bits(), value.to_f64().to_bits());
    }

    #[test]
    fn prop_binary32_matches_native_conversion(value in any::<f64>()) {
        prop_assume!(!value.is_nan());
        let native = u64::from((value as f32).to_bits());
        prop_assert_eq!(BINARY32.encode(&Scalar::from_f64(value), RoundingMode::Rne), native);
    }

    #[test]
    fn prop_directed_roundings_bracket_the_value(value in -1.0e6f64..1.0e6) {
        let down = BINARY16.quantize_with(value, RoundingMode::Rdn);
        let up = BINARY16.quantize_with(value, RoundingMode::Rup);
        let toward_zero = BINARY16.quantize_with(value, RoundingMode::Rtz);
        prop_assert!(down <= value && value <= up);
        prop_assert!(toward_zero.abs() <= value.abs());
        prop_assert!(BINARY16.is_representable(value) == (down == up));
    }
}

// ══════════════════════════════════════════════════════════
// Classification and neighbours
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x0000, FloatClass::Zero)]
#[case(0x8000, FloatClass::Zero)]
#[case(0x0001, FloatClass::Subnormal)]
#[case(0x03ff, FloatClass::Subnormal)]
#[case(0x0400, FloatClass::Normal)]
#[case(0x7c00, FloatClass::Infinite)]
#[case(0xfc00, FloatClass::Infinite)]
#[case(0x7e00, FloatClass::Nan)]
fn test_classify_binary16(#[case] bits: u64, #[case] class: FloatClass) {
    assert_eq!(BINARY16.classify(bits), class);
}

#[test]
fn test_flush_to_zero_keeps_sign() {
    let tiny = BINARY32.min_subnormal();
    assert_eq!(BINARY32.flush_to_zero(tiny).to_bits(), 0.0_f64.to_bits());
    assert_eq!(BINARY32.flush_to_zero(-tiny).to_bits(), (-0.0_f64).to_bits());
    assert_eq!(BINARY32.flush_to_zero(1.5), 1.5);
}

#[test]
fn test_next_up_and_down() {
    assert_eq!(BINARY32.next_up(1.0), 1.0 + 2f64.powi(-23));
    assert_eq!(BINARY32.next_down(1.0), 1.0 - 2f64.powi(-24));
    assert_eq!(BINARY32.next_up(0.0), BINARY32.min_subnormal());
    assert_eq!(BINARY32.next_down(0.0), -BINARY32.min_subnormal());
    assert_eq!(BINARY32.next_up(BINARY32.max_finite()), f64::INFINITY);
    assert_eq!(BINARY32.next_up(f64::INFINITY), f64::INFINITY);
    assert_eq!(BINARY16.next_up(f64::NEG_INFINITY), -65504.0);
    // Not representable in f16: neighbours enclose the value.
    assert_eq!(BINARY16.next_up(1.0001), 1.0 + 2f64.powi(-10));
    assert_eq!(BINARY16.next_down(1.0001), 1.0);
}

// ══════════════════════════════════════════════════════════
// Precision selector
// ══════════════════════════════════════════════════════════

#[test]
fn test_precision_dispatch() {
    assert_eq!(*Precision::F16.format(), BINARY16);
    assert_eq!(*Precision::F32.format(), BINARY32);
    assert_eq!(*Precision::Abstract.format(), BINARY64);
    assert!(Precision::F32.supports_runtime());
    assert!(!Precision::Abstract.supports_runtime());
    assert!(Precision::F16.may_flush_subnormals());
    assert!(!Precision::Abstract.may_flush_subnormals());
}

#[rstest]
#[case("f16", Precision::F16)]
#[case("f32", Precision::F32)]
#[case("abstract", Precision::Abstract)]
fn test_precision_names(#[case] name: &str, #[case] precision: Precision) {
    assert_eq!(name.parse::<Precision>().unwrap(), precision);
    assert_eq!(precision.to_string(), name);
}

#[test]
fn test_unknown_precision() {
    let err = "f64".parse::<Precision>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractViolation);
}

#[test]
fn test_encode_finite_reports_domain_errors() {
    let too_big = Scalar::from_f64(1.0e5);
    let err = Precision::F16
        .encode_finite(&too_big, RoundingMode::Rne)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    // Toward zero saturates at the largest finite value instead.
    assert_eq!(
        Precision::F16
            .encode_finite(&too_big, RoundingMode::Rtz)
            .unwrap(),
        0x7bff
    );
    assert!(
        Precision::F32
            .encode_finite(&Scalar::PositiveInfinity, RoundingMode::Rne)
            .is_err()
    );
}

#[test]
fn test_scalar_display() {
    assert_eq!(Scalar::from_f64(1.5).to_string(), "1.5");
    assert_eq!(Scalar::NegativeZero.to_string(), "-0.0");
}
