//! Rounding directions and exact rounding of rationals.
//!
//! IEEE 754 defines four directed/nearest rounding attributes that matter for
//! acceptance intervals (the fifth, ties-to-away, never widens an interval
//! beyond what these four already cover):
//!
//! | Mode | Description                       |
//! |------|-----------------------------------|
//! | RNE  | Round to Nearest, ties to Even    |
//! | RTZ  | Round towards Zero                |
//! | RDN  | Round Down (towards −∞)           |
//! | RUP  | Round Up (towards +∞)             |
//!
//! Interval endpoints are snapped outward with [`RoundingMode::Rdn`] (low) and
//! [`RoundingMode::Rup`] (high).

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::FloatFormat;

/// Rounding direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round to Nearest, ties to Even (default IEEE mode).
    Rne,
    /// Round towards Zero.
    Rtz,
    /// Round Down (towards −∞).
    Rdn,
    /// Round Up (towards +∞).
    Rup,
}

impl RoundingMode {
    /// Every rounding mode.
    pub const ALL: [Self; 4] = [Self::Rne, Self::Rtz, Self::Rdn, Self::Rup];

    /// Whether the truncated significand must be incremented.
    ///
    /// `remainder / denominator` is the discarded fraction, in `[0, 1)`.
    fn increments(
        self,
        negative: bool,
        remainder: &BigInt,
        denominator: &BigInt,
        odd: bool,
    ) -> bool {
        if remainder.is_zero() {
            return false;
        }
        match self {
            Self::Rne => match (remainder << 1_u32).cmp(denominator) {
                Ordering::Greater => true,
                Ordering::Equal => odd,
                Ordering::Less => false,
            },
            Self::Rtz => false,
            Self::Rdn => negative,
            Self::Rup => !negative,
        }
    }

    /// Result magnitude on overflow: infinity or the largest finite value.
    const fn overflows_to_infinity(self, negative: bool) -> bool {
        match self {
            Self::Rne => true,
            Self::Rtz => false,
            Self::Rdn => negative,
            Self::Rup => !negative,
        }
    }
}

/// Exact power of two as a rational.
pub(crate) fn pow2(exponent: i64) -> BigRational {
    let magnitude = BigInt::one() << exponent.unsigned_abs();
    if exponent >= 0 {
        BigRational::from_integer(magnitude)
    } else {
        BigRational::new_raw(BigInt::one(), magnitude)
    }
}

/// `floor(log2(magnitude))` for a strictly positive rational.
pub(crate) fn floor_log2(magnitude: &BigRational) -> i64 {
    let estimate = magnitude.numer().bits() as i64 - magnitude.denom().bits() as i64;
    if *magnitude < pow2(estimate) {
        estimate - 1
    } else {
        estimate
    }
}

impl FloatFormat {
    /// Rounds an exact rational to a bit-pattern of this format under `mode`.
    ///
    /// Zero encodes as positive zero; a nonzero value that rounds to zero keeps
    /// its sign. Overflow follows IEEE 754: round-to-nearest and the direction
    /// pointing away from zero produce infinity, the others saturate at the
    /// largest finite value. Formats without subnormals flush tiny values.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::format::{BINARY32, RoundingMode, Scalar};
    ///
    /// let tenth = Scalar::from_f64(0.1).to_rational().unwrap();
    /// assert_eq!(BINARY32.round(&tenth, RoundingMode::Rne), 0x3dcc_cccd);
    /// assert_eq!(BINARY32.round(&tenth, RoundingMode::Rdn), 0x3dcc_cccc);
    /// assert_eq!(BINARY32.round(&-tenth, RoundingMode::Rdn), 0xbdcc_cccd);
    /// ```
    pub fn round(&self, value: &BigRational, mode: RoundingMode) -> u64 {
        if value.is_zero() {
            return 0;
        }
        let negative = value.is_negative();
        let sign = if negative { self.sign_mask() } else { 0 };
        let magnitude = value.abs();
        let mantissa_bits = i64::from(self.mantissa_bits);
        let emin = i64::from(self.min_exponent());
        let exponent = floor_log2(&magnitude);

        if exponent < emin && !self.has_subnormals {
            return sign | self.flush_bits(negative, mode);
        }

        // magnitude = (significand + remainder / denominator) * 2^quantum
        let mut quantum = exponent.max(emin) - mantissa_bits;
        let mut numerator = magnitude.numer().clone();
        let mut denominator = magnitude.denom().clone();
        if quantum < 0 {
            numerator <<= quantum.unsigned_abs();
        } else {
            denominator <<= quantum.unsigned_abs();
        }
        let (mut significand, remainder) = numerator.div_rem(&denominator);
        if mode.increments(negative, &remainder, &denominator, significand.is_odd()) {
            significand += 1;
        }

        // significand < 2^(mantissa_bits + 2)
        let mut significand = significand.to_u64().unwrap_or_default();
        let hidden = 1_u64 << self.mantissa_bits;
        if significand == hidden << 1 {
            significand = hidden;
            quantum += 1;
        }
        if significand == 0 {
            return sign;
        }
        if significand < hidden {
            return sign | significand;
        }

        let biased = quantum + mantissa_bits + i64::from(self.bias);
        if biased >= self.exponent_field_max() as i64 {
            return sign | self.overflow_bits(negative, mode);
        }
        sign | ((biased as u64) << self.mantissa_bits) | (significand & self.mantissa_mask())
    }

    /// Unsigned encoding produced when a finite value overflows.
    const fn overflow_bits(&self, negative: bool, mode: RoundingMode) -> u64 {
        if mode.overflows_to_infinity(negative) {
            self.positive_infinity_bits()
        } else {
            self.max_finite_bits()
        }
    }

    /// Unsigned encoding of a value below the normal range when subnormals are absent.
    const fn flush_bits(&self, negative: bool, mode: RoundingMode) -> u64 {
        let away = match mode {
            RoundingMode::Rne | RoundingMode::Rtz => false,
            RoundingMode::Rdn => negative,
            RoundingMode::Rup => !negative,
        };
        if away { self.min_normal_bits() } else { 0 }
    }
}
