//! Dot products and matrix/vector products.
//!
//! Floating-point summation order is implementation-defined, so a component
//! of a product is bounded by the span over every way of pairing its terms:
//! 1. **Products:** each `a[i] * b[i]` is a correctly rounded interval.
//! 2. **Pairings:** up to [`EXHAUSTIVE_ORDER_LIMIT`] terms every binary
//!    summation tree is walked explicitly. Up to [`SUBSET_ORDER_LIMIT`] terms a
//!    dynamic program over term subsets spans the same set of trees. Longer
//!    sums take the exact endpoint sums widened by the rounding error any tree
//!    can accumulate.
//! 3. **Partial sums:** with [`Accumulation::Widened`] each partial sum is
//!    additionally widened by one ULP, covering fused or extended-precision
//!    accumulators.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::arithmetic::endpoints;
use super::extended::Extended;
use super::{Interval, IntervalEngine, IntervalMatrix, IntervalVector, Shape};
use crate::case::Matrix;
use crate::common::constants::{EXHAUSTIVE_ORDER_LIMIT, MAX_DOT_TERMS, SUBSET_ORDER_LIMIT};
use crate::format::rounding::pow2;
use crate::common::{Error, Result};
use crate::config::Accumulation;

impl IntervalEngine {
    /// Acceptance interval of `dot(lhs, rhs)` over every accumulation order.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] when the lengths differ and
    /// [`Error::MalformedShape`] for empty or overlong operands.
    pub fn dot(&self, lhs: &[f64], rhs: &[f64]) -> Result<Interval> {
        if lhs.len() != rhs.len() {
            return Err(Error::DimensionMismatch {
                lhs: Shape::Vector(lhs.len()),
                rhs: Shape::Vector(rhs.len()),
            });
        }
        if lhs.is_empty() || lhs.len() > MAX_DOT_TERMS {
            return Err(Error::MalformedShape(format!(
                "dot product of {} terms (supported: 1..={MAX_DOT_TERMS})",
                lhs.len()
            )));
        }
        let products: Vec<Interval> = lhs
            .iter()
            .zip(rhs)
            .map(|(&a, &b)| self.mul_intervals(&self.operand(a), &self.operand(b)))
            .collect();
        Ok(self.sum_all_orders(&products))
    }

    /// `matrix * vector`: a `cols`×`rows` matrix times a `cols` vector gives a
    /// `rows` vector whose component `r` is `Σ_c matrix[c][r] * vector[c]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::case::Matrix;
    /// use fpcases_core::config::EngineConfig;
    /// use fpcases_core::interval::{EvaluationMode, IntervalEngine};
    /// use fpcases_core::Precision;
    ///
    /// let engine = IntervalEngine::new(Precision::F32, EvaluationMode::NonConst, EngineConfig::default());
    /// let identity = Matrix::from_columns(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    /// let result = engine.matrix_vector(&identity, &[3.5, -2.25]).unwrap();
    /// let first = result.get(0).unwrap();
    /// assert!(first.contains(3.5) && first.width().unwrap() > 0.0);
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] when `vector.len() != matrix.cols()`.
    pub fn matrix_vector(&self, matrix: &Matrix, vector: &[f64]) -> Result<IntervalVector> {
        if vector.len() != matrix.cols() {
            return Err(Error::DimensionMismatch {
                lhs: matrix.shape(),
                rhs: Shape::Vector(vector.len()),
            });
        }
        (0..matrix.rows())
            .map(|row| self.dot(&matrix.row(row), vector))
            .collect::<Result<Vec<_>>>()
            .map(IntervalVector::new)
    }

    /// `vector * matrix`: a `rows` vector times a `cols`×`rows` matrix gives a
    /// `cols` vector whose component `c` is `dot(vector, matrix[c])`.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] when `vector.len() != matrix.rows()`.
    pub fn vector_matrix(&self, vector: &[f64], matrix: &Matrix) -> Result<IntervalVector> {
        if vector.len() != matrix.rows() {
            return Err(Error::DimensionMismatch {
                lhs: Shape::Vector(vector.len()),
                rhs: matrix.shape(),
            });
        }
        (0..matrix.cols())
            .map(|col| self.dot(vector, matrix.column(col)))
            .collect::<Result<Vec<_>>>()
            .map(IntervalVector::new)
    }

    /// `matrix * scalar`, element-wise.
    pub fn matrix_scalar(&self, matrix: &Matrix, scalar: f64) -> IntervalMatrix {
        let scalar = self.operand(scalar);
        let elements: Vec<Interval> = matrix
            .elements()
            .iter()
            .map(|&element| self.mul_intervals(&self.operand(element), &scalar))
            .collect();
        IntervalMatrix {
            cols: matrix.cols(),
            rows: matrix.rows(),
            elements,
        }
    }

    /// Span of the sums of `terms` over every pairing order.
    ///
    /// An empty sum is exactly zero. Beyond [`SUBSET_ORDER_LIMIT`] terms the
    /// result is a bound on that span rather than the span itself.
    pub fn sum_all_orders(&self, terms: &[Interval]) -> Interval {
        match terms {
            [] => Interval::point(0.0),
            [single] => *single,
            _ if terms.len() <= EXHAUSTIVE_ORDER_LIMIT => self.sum_exhaustive(terms),
            _ if terms.len() <= SUBSET_ORDER_LIMIT => self.sum_by_subsets(terms),
            _ => self.sum_bounded(terms),
        }
    }

    fn accumulate(&self, lhs: &Interval, rhs: &Interval) -> Interval {
        let sum = self.add_intervals(lhs, rhs);
        match self.config().accumulation {
            Accumulation::Widened => self.widen_one_ulp(&sum),
            Accumulation::Exact => sum,
        }
    }

    /// Replaces every pair of terms by their partial sum and recurses.
    fn sum_exhaustive(&self, terms: &[Interval]) -> Interval {
        if let [single] = terms {
            return *single;
        }
        let mut result: Option<Interval> = None;
        for i in 0..terms.len() {
            for j in (i + 1)..terms.len() {
                let mut rest: Vec<Interval> = terms
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != i && k != j)
                    .map(|(_, term)| *term)
                    .collect();
                rest.push(self.accumulate(&terms[i], &terms[j]));
                let total = self.sum_exhaustive(&rest);
                result = Some(result.map_or(total, |acc| acc.span(&total)));
            }
        }
        result.unwrap_or_else(Interval::any)
    }

    /// `table[mask]` spans every summation tree over the terms in `mask`.
    fn sum_by_subsets(&self, terms: &[Interval]) -> Interval {
        let full = (1_usize << terms.len()) - 1;
        let mut table: Vec<Option<Interval>> = vec![None; full + 1];
        for (index, term) in terms.iter().enumerate() {
            table[1 << index] = Some(*term);
        }
        for mask in 1..=full {
            if mask.count_ones() < 2 {
                continue;
            }
            let lowest = mask & mask.wrapping_neg();
            let mut best: Option<Interval> = None;
            // Each split is visited once: the half holding the lowest term is `subset`.
            let mut subset = (mask - 1) & mask;
            while subset > 0 {
                if subset & lowest != 0
                    && let (Some(lhs), Some(rhs)) = (table[subset], table[mask ^ subset])
                {
                    let sum = self.accumulate(&lhs, &rhs);
                    best = Some(best.map_or(sum, |acc| acc.span(&sum)));
                }
                subset = (subset - 1) & mask;
            }
            table[mask] = best;
        }
        table[full].unwrap_or_else(Interval::any)
    }

    /// Exact endpoint sums widened by the largest error any summation tree can
    /// accumulate.
    ///
    /// Every partial sum stays within the sum of the term magnitudes, so each
    /// of the `n - 1` additions errs by a few ULPs at that magnitude, plus a
    /// flushed subnormal when flushing is allowed. Infinite or NaN terms and
    /// sums near overflow admit any result.
    fn sum_bounded(&self, terms: &[Interval]) -> Interval {
        let mut low = BigRational::zero();
        let mut high = BigRational::zero();
        let mut magnitude = BigRational::zero();
        for term in terms {
            let Some((Extended::Finite(term_low), Extended::Finite(term_high))) = endpoints(term)
            else {
                return Interval::any();
            };
            magnitude += term_low.abs().max(term_high.abs());
            low += term_low;
            high += term_high;
        }
        let format = self.format();
        let additions = BigRational::from_integer(BigInt::from(terms.len().saturating_sub(1)));
        let per_addition = match self.config().accumulation {
            Accumulation::Widened => 8_u32,
            Accumulation::Exact => 4_u32,
        };
        let mut slack =
            format.ulp(&magnitude) * BigRational::from_integer(BigInt::from(per_addition)) * &additions;
        if self.flushes() {
            slack += pow2(i64::from(format.min_exponent())) * &additions;
        }
        let Some(Extended::Finite(max_finite)) = Extended::from_f64(format.max_finite()) else {
            return Interval::any();
        };
        if &magnitude + &slack > max_finite {
            return Interval::any();
        }
        self.envelope(&Extended::Finite(low - &slack), &Extended::Finite(high + slack))
    }
}
