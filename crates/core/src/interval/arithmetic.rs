//! Binary arithmetic operators over intervals.
//!
//! Each operator evaluates the exact result at the interval endpoints with
//! extended-real arithmetic, then snaps the hull outward. Undefined forms
//! reachable from the operands (∞ − ∞, 0 × ∞, ∞ / ∞, division by an interval
//! containing zero) make every result acceptable, NaN included.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use super::extended::Extended;
use super::{Interval, IntervalEngine};
use crate::format::rounding::pow2;

/// Scalar binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`, correctly rounded.
    Addition,
    /// `a - b`, correctly rounded.
    Subtraction,
    /// `a * b`, correctly rounded.
    Multiplication,
    /// `a / b`, accurate to 2.5 ULP inside the divisor domain.
    Division,
}

impl BinaryOp {
    /// WGSL operator token.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "*",
            Self::Division => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Exact endpoints of a purely numeric interval.
pub(super) fn endpoints(interval: &Interval) -> Option<(Extended, Extended)> {
    if interval.accepts_nan() {
        return None;
    }
    let (low, high) = interval.bounds()?;
    Some((Extended::from_f64(low)?, Extended::from_f64(high)?))
}

fn contains_zero(low: &Extended, high: &Extended) -> bool {
    *low <= Extended::zero() && Extended::zero() <= *high
}

impl IntervalEngine {
    /// Acceptance interval of `lhs op rhs` for two case inputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::config::EngineConfig;
    /// use fpcases_core::interval::{BinaryOp, EvaluationMode, IntervalEngine};
    /// use fpcases_core::Precision;
    ///
    /// let engine = IntervalEngine::new(Precision::F32, EvaluationMode::Const, EngineConfig::default());
    /// let sum = engine.binary(BinaryOp::Addition, 1.0, 2.0f64.powi(-30));
    /// assert_eq!(sum.bounds(), Some((1.0, 1.0 + 2.0f64.powi(-23))));
    /// assert!(engine.binary(BinaryOp::Multiplication, 0.0, f64::INFINITY).accepts_nan());
    /// ```
    pub fn binary(&self, op: BinaryOp, lhs: f64, rhs: f64) -> Interval {
        let lhs = self.operand(lhs);
        let rhs = self.operand(rhs);
        match op {
            BinaryOp::Addition => self.add_intervals(&lhs, &rhs),
            BinaryOp::Subtraction => self.sub_intervals(&lhs, &rhs),
            BinaryOp::Multiplication => self.mul_intervals(&lhs, &rhs),
            BinaryOp::Division => self.div_intervals(&lhs, &rhs),
        }
    }

    /// Correctly rounded sum of two intervals.
    pub fn add_intervals(&self, lhs: &Interval, rhs: &Interval) -> Interval {
        let (Some((a_low, a_high)), Some((b_low, b_high))) = (endpoints(lhs), endpoints(rhs))
        else {
            return Interval::any();
        };
        let opposite_infinities = (a_low == Extended::NegativeInfinity
            && b_high == Extended::PositiveInfinity)
            || (a_high == Extended::PositiveInfinity && b_low == Extended::NegativeInfinity);
        if opposite_infinities {
            return Interval::any();
        }
        match (a_low.add(&b_low), a_high.add(&b_high)) {
            (Some(low), Some(high)) => self.envelope(&low, &high),
            _ => Interval::any(),
        }
    }

    /// Correctly rounded difference of two intervals.
    pub fn sub_intervals(&self, lhs: &Interval, rhs: &Interval) -> Interval {
        let (Some((a_low, a_high)), Some((b_low, b_high))) = (endpoints(lhs), endpoints(rhs))
        else {
            return Interval::any();
        };
        let like_infinities = (a_low == Extended::NegativeInfinity
            && b_low == Extended::NegativeInfinity)
            || (a_high == Extended::PositiveInfinity && b_high == Extended::PositiveInfinity);
        if like_infinities {
            return Interval::any();
        }
        match (a_low.sub(&b_high), a_high.sub(&b_low)) {
            (Some(low), Some(high)) => self.envelope(&low, &high),
            _ => Interval::any(),
        }
    }

    /// Correctly rounded product of two intervals.
    pub fn mul_intervals(&self, lhs: &Interval, rhs: &Interval) -> Interval {
        let (Some((a_low, a_high)), Some((b_low, b_high))) = (endpoints(lhs), endpoints(rhs))
        else {
            return Interval::any();
        };
        let zero_times_infinity = (contains_zero(&a_low, &a_high)
            && (b_low.is_infinite() || b_high.is_infinite()))
            || (contains_zero(&b_low, &b_high) && (a_low.is_infinite() || a_high.is_infinite()));
        if zero_times_infinity {
            return Interval::any();
        }
        let products = [
            a_low.mul(&b_low),
            a_low.mul(&b_high),
            a_high.mul(&b_low),
            a_high.mul(&b_high),
        ];
        self.hull(products)
    }

    /// Division accurate to 2.5 ULP.
    ///
    /// Divisors with magnitude outside `[2^emin, 2^(emax-1)]` admit any result,
    /// as does a divisor interval containing zero.
    pub fn div_intervals(&self, lhs: &Interval, rhs: &Interval) -> Interval {
        let (Some((a_low, a_high)), Some((b_low, b_high))) = (endpoints(lhs), endpoints(rhs))
        else {
            return Interval::any();
        };
        if contains_zero(&b_low, &b_high) || !self.in_divisor_domain(&b_low, &b_high) {
            return Interval::any();
        }
        let quotients = [
            a_low.div(&b_low),
            a_low.div(&b_high),
            a_high.div(&b_low),
            a_high.div(&b_high),
        ];
        let exact = self.hull(quotients);
        if a_low.is_infinite() || a_high.is_infinite() {
            return exact;
        }
        let two_and_a_half = BigRational::new(BigInt::from(5), BigInt::from(2));
        self.widen_ulps(&exact, &two_and_a_half)
    }

    fn in_divisor_domain(&self, low: &Extended, high: &Extended) -> bool {
        let format = self.format();
        let smallest = Extended::Finite(pow2(i64::from(format.min_exponent())));
        let largest = Extended::Finite(pow2(i64::from(format.max_exponent()) - 1));
        let magnitudes = if *high < Extended::zero() {
            (high.neg(), low.neg())
        } else {
            (low.clone(), high.clone())
        };
        magnitudes.0 >= smallest && magnitudes.1 <= largest
    }

    /// Outward-rounded hull of candidate endpoints; any undefined candidate
    /// admits every result.
    fn hull(&self, candidates: [Option<Extended>; 4]) -> Interval {
        let mut defined = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match candidate {
                Some(value) => defined.push(value),
                None => return Interval::any(),
            }
        }
        match (defined.iter().min(), defined.iter().max()) {
            (Some(low), Some(high)) => self.envelope(low, high),
            _ => Interval::any(),
        }
    }
}
