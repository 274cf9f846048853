//! Exact arithmetic over the extended reals.

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::format::Scalar;

/// An exact interval endpoint: a rational or one of the two infinities.
///
/// The derived ordering is numeric because the variants are declared from
/// smallest to largest. Every operation returns `None` when the result is
/// undefined (∞ − ∞, 0 × ∞, ∞ / ∞, x / 0), which callers turn into NaN.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Extended {
    NegativeInfinity,
    Finite(BigRational),
    PositiveInfinity,
}

impl Extended {
    pub(crate) fn zero() -> Self {
        Self::Finite(BigRational::zero())
    }

    /// Exact value of an `f64`; both zeros map to zero and NaN to `None`.
    pub(crate) fn from_f64(value: f64) -> Option<Self> {
        Self::from_scalar(&Scalar::from_f64(value))
    }

    pub(crate) fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Finite(exact) => Some(Self::Finite(exact.clone())),
            Scalar::NegativeZero => Some(Self::zero()),
            Scalar::PositiveInfinity => Some(Self::PositiveInfinity),
            Scalar::NegativeInfinity => Some(Self::NegativeInfinity),
            Scalar::Nan => None,
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        matches!(self, Self::Finite(value) if value.is_zero())
    }

    pub(crate) const fn is_infinite(&self) -> bool {
        !matches!(self, Self::Finite(_))
    }

    fn is_negative(&self) -> bool {
        match self {
            Self::NegativeInfinity => true,
            Self::Finite(value) => value.is_negative(),
            Self::PositiveInfinity => false,
        }
    }

    const fn infinity(negative: bool) -> Self {
        if negative {
            Self::NegativeInfinity
        } else {
            Self::PositiveInfinity
        }
    }

    pub(crate) fn neg(&self) -> Self {
        match self {
            Self::NegativeInfinity => Self::PositiveInfinity,
            Self::Finite(value) => Self::Finite(-value),
            Self::PositiveInfinity => Self::NegativeInfinity,
        }
    }

    pub(crate) fn add(&self, rhs: &Self) -> Option<Self> {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => Some(Self::Finite(a + b)),
            (Self::PositiveInfinity, Self::NegativeInfinity)
            | (Self::NegativeInfinity, Self::PositiveInfinity) => None,
            (Self::Finite(_), infinite) | (infinite, _) => Some(infinite.clone()),
        }
    }

    pub(crate) fn sub(&self, rhs: &Self) -> Option<Self> {
        self.add(&rhs.neg())
    }

    pub(crate) fn mul(&self, rhs: &Self) -> Option<Self> {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => Some(Self::Finite(a * b)),
            _ if self.is_zero() || rhs.is_zero() => None,
            _ => Some(Self::infinity(self.is_negative() != rhs.is_negative())),
        }
    }

    pub(crate) fn div(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => Some(Self::Finite(a / b)),
            (Self::Finite(_), _) => Some(Self::zero()),
            (_, Self::Finite(_)) => {
                Some(Self::infinity(self.is_negative() != rhs.is_negative()))
            }
            _ => None,
        }
    }
}
