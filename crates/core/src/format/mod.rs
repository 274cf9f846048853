//! Floating-point format model.
//!
//! A [`FloatFormat`] describes an IEEE 754 binary interchange layout. All three
//! precisions exercised by shader tests are expressed through it:
//!
//! | Precision  | Layout    | Exponent bits | Mantissa bits | Bias |
//! |------------|-----------|---------------|---------------|------|
//! | `f16`      | binary16  | 5             | 10            | 15   |
//! | `f32`      | binary32  | 8             | 23            | 127  |
//! | `abstract` | binary64  | 11            | 52            | 1023 |
//!
//! Abstract values are *stored* as binary64 bit-patterns but every reference
//! computation over them is carried out with exact rationals ([`Scalar`]).
//! Values of every format travel through the crate as `f64` carriers, which is
//! exact because binary64 contains binary16 and binary32.
//!
//! Submodules:
//! - [`rounding`]: Rounding directions and the exact rational rounder.
//! - [`scalar`]: The arbitrary-precision reference value.

/// Rounding directions and exact rounding of rationals into a format.
pub mod rounding;

/// Arbitrary-precision reference scalar.
pub mod scalar;

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::Deserialize;

use crate::common::{Error, Result};

pub use self::rounding::RoundingMode;
pub use self::scalar::Scalar;

use self::rounding::{floor_log2, pow2};

/// Bit-level layout of a binary floating-point format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FloatFormat {
    /// Total encoded width in bits.
    pub bit_width: u32,
    /// Width of the biased exponent field.
    pub exponent_bits: u32,
    /// Width of the trailing significand field (hidden bit excluded).
    pub mantissa_bits: u32,
    /// Exponent bias; also the largest unbiased exponent of a finite value.
    pub bias: i32,
    /// Whether an all-zero exponent field encodes gradual underflow.
    pub has_subnormals: bool,
}

/// IEEE 754 binary16 (`f16`).
pub const BINARY16: FloatFormat = FloatFormat {
    bit_width: 16,
    exponent_bits: 5,
    mantissa_bits: 10,
    bias: 15,
    has_subnormals: true,
};

/// IEEE 754 binary32 (`f32`).
pub const BINARY32: FloatFormat = FloatFormat {
    bit_width: 32,
    exponent_bits: 8,
    mantissa_bits: 23,
    bias: 127,
    has_subnormals: true,
};

/// IEEE 754 binary64, the storage layout of abstract floats.
pub const BINARY64: FloatFormat = FloatFormat {
    bit_width: 64,
    exponent_bits: 11,
    mantissa_bits: 52,
    bias: 1023,
    has_subnormals: true,
};

/// Classification of an encoded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatClass {
    /// Positive or negative zero.
    Zero,
    /// Nonzero with an all-zero exponent field.
    Subnormal,
    /// Finite with a biased exponent in `1..max`.
    Normal,
    /// Positive or negative infinity.
    Infinite,
    /// Any NaN encoding.
    Nan,
}

impl FloatFormat {
    /// Mask selecting the encoded bits.
    pub const fn bits_mask(&self) -> u64 {
        if self.bit_width >= 64 {
            u64::MAX
        } else {
            (1 << self.bit_width) - 1
        }
    }

    /// Mask of the sign bit.
    pub const fn sign_mask(&self) -> u64 {
        1 << (self.bit_width - 1)
    }

    /// Mask of the biased exponent field.
    pub const fn exponent_mask(&self) -> u64 {
        self.exponent_field_max() << self.mantissa_bits
    }

    /// Mask of the trailing significand field.
    pub const fn mantissa_mask(&self) -> u64 {
        (1 << self.mantissa_bits) - 1
    }

    /// Largest biased exponent field value (reserved for infinities and NaN).
    pub const fn exponent_field_max(&self) -> u64 {
        (1 << self.exponent_bits) - 1
    }

    /// Largest unbiased exponent of a finite value.
    pub const fn max_exponent(&self) -> i32 {
        self.bias
    }

    /// Unbiased exponent of the smallest normal value.
    pub const fn min_exponent(&self) -> i32 {
        1 - self.bias
    }

    /// Encoding of positive infinity.
    pub const fn positive_infinity_bits(&self) -> u64 {
        self.exponent_mask()
    }

    /// Encoding of negative infinity.
    pub const fn negative_infinity_bits(&self) -> u64 {
        self.sign_mask() | self.exponent_mask()
    }

    /// Canonical quiet NaN (positive, quiet bit set, zero payload).
    pub const fn canonical_nan_bits(&self) -> u64 {
        self.exponent_mask() | (1 << (self.mantissa_bits - 1))
    }

    /// Encoding of the largest finite value.
    pub const fn max_finite_bits(&self) -> u64 {
        ((self.exponent_field_max() - 1) << self.mantissa_bits) | self.mantissa_mask()
    }

    /// Encoding of the smallest positive normal value.
    pub const fn min_normal_bits(&self) -> u64 {
        1 << self.mantissa_bits
    }

    /// Encoding of the largest positive subnormal value.
    pub const fn max_subnormal_bits(&self) -> u64 {
        self.mantissa_mask()
    }

    /// Encoding of the smallest positive subnormal value.
    pub const fn min_subnormal_bits(&self) -> u64 {
        1
    }

    /// Classifies an encoded value.
    pub const fn classify(&self, bits: u64) -> FloatClass {
        let field = (bits & self.exponent_mask()) >> self.mantissa_bits;
        let mantissa = bits & self.mantissa_mask();
        if field == self.exponent_field_max() {
            if mantissa == 0 {
                FloatClass::Infinite
            } else {
                FloatClass::Nan
            }
        } else if field == 0 {
            if mantissa == 0 {
                FloatClass::Zero
            } else {
                FloatClass::Subnormal
            }
        } else {
            FloatClass::Normal
        }
    }

    /// Returns true when the sign bit of `bits` is set.
    pub const fn is_sign_negative_bits(&self, bits: u64) -> bool {
        bits & self.sign_mask() != 0
    }

    /// Decodes a bit-pattern into an exact [`Scalar`].
    ///
    /// Bits above `bit_width` are ignored. Every NaN payload decodes to
    /// [`Scalar::Nan`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::format::{BINARY16, BINARY32, Scalar};
    ///
    /// assert_eq!(BINARY32.decode(0x3f80_0000), Scalar::from_integer(1));
    /// assert_eq!(BINARY16.decode(0x8000), Scalar::NegativeZero);
    /// assert!(BINARY16.decode(0x7e00).is_nan());
    /// ```
    pub fn decode(&self, bits: u64) -> Scalar {
        let bits = bits & self.bits_mask();
        let negative = self.is_sign_negative_bits(bits);
        let field = (bits & self.exponent_mask()) >> self.mantissa_bits;
        let mantissa = bits & self.mantissa_mask();
        let mantissa_bits = i64::from(self.mantissa_bits);

        if field == self.exponent_field_max() {
            return match (mantissa == 0, negative) {
                (true, false) => Scalar::PositiveInfinity,
                (true, true) => Scalar::NegativeInfinity,
                (false, _) => Scalar::Nan,
            };
        }
        if field == 0 && mantissa == 0 {
            return if negative {
                Scalar::NegativeZero
            } else {
                Scalar::zero()
            };
        }

        let (significand, exponent) = if field == 0 {
            (mantissa, i64::from(self.min_exponent()) - mantissa_bits)
        } else {
            (
                mantissa | (1 << self.mantissa_bits),
                field as i64 - i64::from(self.bias) - mantissa_bits,
            )
        };
        let magnitude = BigRational::from_integer(BigInt::from(significand)) * pow2(exponent);
        Scalar::Finite(if negative { -magnitude } else { magnitude })
    }

    /// Encodes a [`Scalar`] under `mode`.
    ///
    /// Never fails: values beyond the finite range resolve to infinity or the
    /// largest finite value depending on the rounding direction, exactly as
    /// IEEE 754 overflow does. NaN encodes as the canonical quiet NaN.
    pub fn encode(&self, value: &Scalar, mode: RoundingMode) -> u64 {
        match value {
            Scalar::Finite(exact) => self.round(exact, mode),
            Scalar::NegativeZero => self.sign_mask(),
            Scalar::PositiveInfinity => self.positive_infinity_bits(),
            Scalar::NegativeInfinity => self.negative_infinity_bits(),
            Scalar::Nan => self.canonical_nan_bits(),
        }
    }

    /// Converts an encoded value to its exact `f64` carrier.
    pub fn to_f64(&self, bits: u64) -> f64 {
        if *self == BINARY64 {
            f64::from_bits(bits)
        } else if *self == BINARY32 {
            f64::from(f32::from_bits(bits as u32))
        } else {
            self.decode(bits).to_f64()
        }
    }

    /// Encodes an `f64` into this format under `mode`.
    pub fn from_f64(&self, value: f64, mode: RoundingMode) -> u64 {
        if value.is_nan() {
            return self.canonical_nan_bits();
        }
        if *self == BINARY64 {
            return value.to_bits();
        }
        if *self == BINARY32 && mode == RoundingMode::Rne {
            return u64::from((value as f32).to_bits());
        }
        self.encode(&Scalar::from_f64(value), mode)
    }

    /// Rounds an `f64` to the nearest value of this format (ties to even).
    pub fn quantize(&self, value: f64) -> f64 {
        self.quantize_with(value, RoundingMode::Rne)
    }

    /// Rounds an `f64` to a value of this format under `mode`.
    pub fn quantize_with(&self, value: f64, mode: RoundingMode) -> f64 {
        self.to_f64(self.from_f64(value, mode))
    }

    /// Returns true when `value` is exactly a value of this format.
    ///
    /// Infinities and NaN are representable in every format.
    pub fn is_representable(&self, value: f64) -> bool {
        if !value.is_finite() || *self == BINARY64 {
            return true;
        }
        let down = self.from_f64(value, RoundingMode::Rdn);
        let up = self.from_f64(value, RoundingMode::Rup);
        down == up
    }

    /// Returns true when `value` rounds to a subnormal of this format.
    pub fn is_subnormal(&self, value: f64) -> bool {
        self.classify(self.from_f64(value, RoundingMode::Rne)) == FloatClass::Subnormal
    }

    /// Replaces a subnormal value by the zero of the same sign.
    pub fn flush_to_zero(&self, value: f64) -> f64 {
        if self.is_subnormal(value) {
            0.0_f64.copysign(value)
        } else {
            value
        }
    }

    /// Smallest value of this format strictly greater than `value`.
    ///
    /// `value` need not be representable. `+inf` and NaN map to themselves.
    pub fn next_up(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        let floor = self.from_f64(value, RoundingMode::Rdn);
        self.to_f64(self.next_up_bits(floor))
    }

    /// Largest value of this format strictly less than `value`.
    ///
    /// `value` need not be representable. `-inf` and NaN map to themselves.
    pub fn next_down(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        let ceiling = self.from_f64(value, RoundingMode::Rup);
        self.to_f64(self.next_down_bits(ceiling))
    }

    /// Successor of an encoded value in numeric order.
    pub const fn next_up_bits(&self, bits: u64) -> u64 {
        match self.classify(bits) {
            FloatClass::Nan => bits,
            FloatClass::Zero => self.min_subnormal_bits(),
            _ if bits == self.positive_infinity_bits() => bits,
            _ if self.is_sign_negative_bits(bits) => bits - 1,
            _ => bits + 1,
        }
    }

    /// Predecessor of an encoded value in numeric order.
    pub const fn next_down_bits(&self, bits: u64) -> u64 {
        match self.classify(bits) {
            FloatClass::Nan => bits,
            FloatClass::Zero => self.sign_mask() | self.min_subnormal_bits(),
            _ if bits == self.negative_infinity_bits() => bits,
            _ if self.is_sign_negative_bits(bits) => bits + 1,
            _ => bits - 1,
        }
    }

    /// One unit in the last place at `value`.
    ///
    /// For a representable value this is the distance to its nearer
    /// neighbour; otherwise it is the distance between the two representable
    /// values enclosing it. At and beyond the largest finite value the gap
    /// below the largest finite value is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::format::{BINARY32, Scalar};
    /// use num_rational::BigRational;
    ///
    /// let one = BigRational::from_integer(1.into());
    /// // The gap below 1.0 is half the gap above it.
    /// assert_eq!(BINARY32.ulp(&one), Scalar::from_f64(2f64.powi(-24)).to_rational().unwrap());
    /// ```
    pub fn ulp(&self, value: &BigRational) -> BigRational {
        let mantissa_bits = i64::from(self.mantissa_bits);
        let emin = i64::from(self.min_exponent());
        let emax = i64::from(self.max_exponent());
        let magnitude = value.abs();

        if magnitude.is_zero() {
            return pow2(emin - mantissa_bits);
        }
        let exponent = floor_log2(&magnitude);
        if exponent > emax {
            return pow2(emax - mantissa_bits);
        }
        let quantum = pow2(exponent.max(emin) - mantissa_bits);
        let power_of_two = magnitude == pow2(exponent);
        if power_of_two && exponent > emin {
            quantum / BigRational::from_integer(BigInt::from(2))
        } else {
            quantum
        }
    }

    /// Largest finite value.
    pub fn max_finite(&self) -> f64 {
        self.to_f64(self.max_finite_bits())
    }

    /// Smallest positive normal value.
    pub fn min_normal(&self) -> f64 {
        self.to_f64(self.min_normal_bits())
    }

    /// Largest positive subnormal value.
    pub fn max_subnormal(&self) -> f64 {
        self.to_f64(self.max_subnormal_bits())
    }

    /// Smallest positive subnormal value.
    pub fn min_subnormal(&self) -> f64 {
        self.to_f64(self.min_subnormal_bits())
    }
}

/// Precisions exercised by shader floating-point tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// WGSL `f16`.
    F16,
    /// WGSL `f32`.
    F32,
    /// WGSL `AbstractFloat`, evaluated only at shader-creation time.
    Abstract,
}

impl Precision {
    /// Every precision, in catalog registration order.
    pub const ALL: [Self; 3] = [Self::F32, Self::F16, Self::Abstract];

    /// Layout of this precision.
    pub const fn format(self) -> &'static FloatFormat {
        match self {
            Self::F16 => &BINARY16,
            Self::F32 => &BINARY32,
            Self::Abstract => &BINARY64,
        }
    }

    /// Short lowercase name used in case keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::Abstract => "abstract",
        }
    }

    /// Runtime evaluation may flush subnormal operands and results to zero.
    pub const fn may_flush_subnormals(self) -> bool {
        match self {
            Self::F16 | Self::F32 => true,
            Self::Abstract => false,
        }
    }

    /// Values of this precision can be computed by a running shader.
    pub const fn supports_runtime(self) -> bool {
        match self {
            Self::F16 | Self::F32 => true,
            Self::Abstract => false,
        }
    }

    /// Encodes `value`, failing when it is not a finite value of this precision
    /// after rounding.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::format::{Precision, RoundingMode, Scalar};
    /// use fpcases_core::ErrorKind;
    ///
    /// let big = Scalar::from_f64(1.0e6);
    /// let err = Precision::F16.encode_finite(&big, RoundingMode::Rne).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Domain);
    /// assert_eq!(Precision::F32.encode_finite(&big, RoundingMode::Rne).unwrap(), 0x4974_2400);
    /// ```
    pub fn encode_finite(self, value: &Scalar, mode: RoundingMode) -> Result<u64> {
        let format = self.format();
        let bits = format.encode(value, mode);
        match format.classify(bits) {
            FloatClass::Infinite | FloatClass::Nan => Err(Error::Domain {
                value: value.to_string(),
                precision: self,
            }),
            _ => Ok(bits),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Precision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|precision| precision.name() == s)
            .ok_or_else(|| Error::UnknownPrecision(s.to_owned()))
    }
}
