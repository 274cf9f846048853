//! Exact reference scalar.
//!
//! [`Scalar`] is the arbitrary-precision value every acceptance computation is
//! carried out in. Finite values are big rationals, so no rounding error from
//! the reference arithmetic can leak into an acceptance bound.

use std::fmt;
use std::ops::Neg;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::{BINARY64, RoundingMode};

/// A floating-point value tagged by kind. Immutable once constructed.
///
/// Positive zero is `Finite(0)`; negative zero has its own variant so the two
/// zeros stay distinct while comparing numerically equal through
/// [`Scalar::numeric_eq`]. The derived `PartialEq` is structural.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    /// A finite value (positive zero included).
    Finite(BigRational),
    /// Negative zero.
    NegativeZero,
    /// +∞.
    PositiveInfinity,
    /// −∞.
    NegativeInfinity,
    /// Not a number.
    Nan,
}

impl Scalar {
    /// Positive zero.
    pub fn zero() -> Self {
        Self::Finite(BigRational::zero())
    }

    /// An integer value.
    pub fn from_integer(value: i64) -> Self {
        Self::Finite(BigRational::from_integer(BigInt::from(value)))
    }

    /// Exact value of an `f64`.
    pub fn from_f64(value: f64) -> Self {
        BINARY64.decode(value.to_bits())
    }

    /// Nearest `f64` (ties to even). Exact for every binary16/32/64 value.
    pub fn to_f64(&self) -> f64 {
        f64::from_bits(BINARY64.encode(self, RoundingMode::Rne))
    }

    /// Exact numeric value of a finite scalar; zero for negative zero.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Self::Finite(value) => Some(value.clone()),
            Self::NegativeZero => Some(BigRational::zero()),
            Self::PositiveInfinity | Self::NegativeInfinity | Self::Nan => None,
        }
    }

    /// Returns true for NaN.
    pub const fn is_nan(&self) -> bool {
        matches!(self, Self::Nan)
    }

    /// Returns true for either infinity.
    pub const fn is_infinite(&self) -> bool {
        matches!(self, Self::PositiveInfinity | Self::NegativeInfinity)
    }

    /// Returns true for finite values, zeros included.
    pub const fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_) | Self::NegativeZero)
    }

    /// Returns true for either zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Finite(value) => value.is_zero(),
            Self::NegativeZero => true,
            _ => false,
        }
    }

    /// Sign bit of the value. NaN reports positive.
    pub fn is_sign_negative(&self) -> bool {
        match self {
            Self::Finite(value) => value.is_negative(),
            Self::NegativeZero | Self::NegativeInfinity => true,
            Self::PositiveInfinity | Self::Nan => false,
        }
    }

    /// IEEE equality: zeros are equal, NaN equals nothing.
    pub fn numeric_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nan, _) | (_, Self::Nan) => false,
            (Self::PositiveInfinity, Self::PositiveInfinity)
            | (Self::NegativeInfinity, Self::NegativeInfinity) => true,
            _ => match (self.to_rational(), other.to_rational()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<BigRational> for Scalar {
    fn from(value: BigRational) -> Self {
        Self::Finite(value)
    }
}

impl Neg for Scalar {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Finite(value) if value.is_zero() => Self::NegativeZero,
            Self::Finite(value) => Self::Finite(-value),
            Self::NegativeZero => Self::zero(),
            Self::PositiveInfinity => Self::NegativeInfinity,
            Self::NegativeInfinity => Self::PositiveInfinity,
            Self::Nan => Self::Nan,
        }
    }
}

impl fmt::Display for Scalar {
    /// Formats through the nearest `f64`; values beyond binary64 print as rationals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) if self.to_f64().is_infinite() => write!(f, "{value}"),
            _ => write!(f, "{:?}", self.to_f64()),
        }
    }
}
