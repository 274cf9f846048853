//! Acceptance intervals and the interval arithmetic engine.
//!
//! An [`Interval`] bounds every result a conforming implementation may produce
//! for one scalar output. Composite results use [`IntervalVector`] and
//! [`IntervalMatrix`]; bit-exact operations use an explicit set of encodings.
//! All of them are wrapped by [`Expectation`], the value stored in case tables.
//!
//! Submodules:
//! - [`engine`]: the evaluation context and unary builtins.
//! - `extended`: exact extended-real arithmetic used for endpoints.
//! - `arithmetic`: binary operators over intervals.
//! - `accumulate`: dot products and matrix/vector products.

/// Interval evaluation context and unary builtins.
pub mod engine;

mod accumulate;
mod arithmetic;
mod extended;

use std::fmt;

use crate::case::Value;
use crate::common::constants::{CONST_SUFFIX, NON_CONST_SUFFIX};
use crate::format::{FloatClass, FloatFormat, RoundingMode};

pub use self::arithmetic::BinaryOp;
pub use self::engine::{IntervalEngine, UnaryOp};

/// Closed range of acceptable results, optionally admitting NaN.
///
/// Endpoints are values of the evaluated format carried as `f64` and may be
/// infinite. An interval that accepts only NaN has no numeric range at all and
/// is distinct from every numeric interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    bounds: Option<(f64, f64)>,
    accepts_nan: bool,
}

impl Interval {
    /// Numeric interval `[low, high]`.
    ///
    /// Endpoints given in the wrong order are swapped. A NaN endpoint yields
    /// the NaN-only interval.
    pub fn new(low: f64, high: f64) -> Self {
        if low.is_nan() || high.is_nan() {
            return Self::nan();
        }
        Self {
            bounds: Some((low.min(high), low.max(high))),
            accepts_nan: false,
        }
    }

    /// Single-value interval; NaN yields the NaN-only interval.
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Interval accepting only NaN.
    pub const fn nan() -> Self {
        Self {
            bounds: None,
            accepts_nan: true,
        }
    }

    /// Interval accepting every value, NaN included.
    pub const fn any() -> Self {
        Self {
            bounds: Some((f64::NEG_INFINITY, f64::INFINITY)),
            accepts_nan: true,
        }
    }

    /// The same interval additionally admitting NaN.
    #[must_use]
    pub const fn with_nan(self) -> Self {
        Self {
            bounds: self.bounds,
            accepts_nan: true,
        }
    }

    /// Numeric range, or `None` for the NaN-only interval.
    pub const fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// Lower endpoint.
    pub fn low(&self) -> Option<f64> {
        self.bounds.map(|(low, _)| low)
    }

    /// Upper endpoint.
    pub fn high(&self) -> Option<f64> {
        self.bounds.map(|(_, high)| high)
    }

    /// Whether NaN is an acceptable result.
    pub const fn accepts_nan(&self) -> bool {
        self.accepts_nan
    }

    /// Whether only NaN is acceptable.
    pub const fn is_nan_only(&self) -> bool {
        self.bounds.is_none()
    }

    /// Whether every value is acceptable.
    pub fn is_any(&self) -> bool {
        self.accepts_nan && self.bounds == Some((f64::NEG_INFINITY, f64::INFINITY))
    }

    /// Whether exactly one numeric value is acceptable.
    pub fn is_point(&self) -> bool {
        !self.accepts_nan && matches!(self.bounds, Some((low, high)) if low == high)
    }

    /// Whether the interval is numeric with finite endpoints and rejects NaN.
    pub fn is_finite(&self) -> bool {
        !self.accepts_nan
            && matches!(self.bounds, Some((low, high)) if low.is_finite() && high.is_finite())
    }

    /// `high - low`, or `None` for the NaN-only interval.
    pub fn width(&self) -> Option<f64> {
        self.bounds.map(|(low, high)| high - low)
    }

    /// Whether `value` is an acceptable result.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return self.accepts_nan;
        }
        matches!(self.bounds, Some((low, high)) if low <= value && value <= high)
    }

    /// Whether every result accepted by `other` is accepted by `self`.
    pub fn contains_interval(&self, other: &Self) -> bool {
        if other.accepts_nan && !self.accepts_nan {
            return false;
        }
        match (self.bounds, other.bounds) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some((low, high)), Some((other_low, other_high))) => {
                low <= other_low && other_high <= high
            }
        }
    }

    /// Smallest interval accepting everything either interval accepts.
    #[must_use]
    pub fn span(&self, other: &Self) -> Self {
        let bounds = match (self.bounds, other.bounds) {
            (None, bounds) | (bounds, None) => bounds,
            (Some((a_low, a_high)), Some((b_low, b_high))) => {
                Some((a_low.min(b_low), a_high.max(b_high)))
            }
        };
        Self {
            bounds,
            accepts_nan: self.accepts_nan || other.accepts_nan,
        }
    }

    /// Span of a sequence of intervals; `None` when the sequence is empty.
    pub fn span_all<'a>(intervals: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        intervals
            .into_iter()
            .fold(None, |acc: Option<Self>, next| Some(acc.map_or(*next, |acc| acc.span(next))))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.bounds, self.accepts_nan) {
            (None, _) => write!(f, "{{NaN}}"),
            (Some((low, high)), nan) => {
                if low == high {
                    write!(f, "[{low:?}]")?;
                } else {
                    write!(f, "[{low:?}, {high:?}]")?;
                }
                if nan { write!(f, " ∪ {{NaN}}") } else { Ok(()) }
            }
        }
    }
}

/// Shape of an operand or result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single value.
    Scalar,
    /// A vector with the given number of components.
    Vector(usize),
    /// A matrix with `cols` columns of `rows` components each (WGSL `matCxR`).
    Matrix {
        /// Column count.
        cols: usize,
        /// Row count.
        rows: usize,
    },
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Vector(len) => write!(f, "vec{len}"),
            Self::Matrix { cols, rows } => write!(f, "mat{cols}x{rows}"),
        }
    }
}

/// Fixed-length vector of per-component intervals.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalVector(Vec<Interval>);

impl IntervalVector {
    /// Wraps per-component intervals.
    pub const fn new(components: Vec<Interval>) -> Self {
        Self(components)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interval of one component.
    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.0.get(index)
    }

    /// All component intervals.
    pub fn components(&self) -> &[Interval] {
        &self.0
    }

    /// Whether every component accepts the matching element of `values`.
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.0.len()
            && self.0.iter().zip(values).all(|(interval, &value)| interval.contains(value))
    }
}

/// Column-major matrix of per-element intervals.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalMatrix {
    cols: usize,
    rows: usize,
    elements: Vec<Interval>,
}

impl IntervalMatrix {
    /// Builds a `cols`×`rows` matrix from column-major elements.
    ///
    /// Returns `None` when the element count does not match the shape.
    pub fn new(cols: usize, rows: usize, elements: Vec<Interval>) -> Option<Self> {
        (elements.len() == cols * rows).then_some(Self {
            cols,
            rows,
            elements,
        })
    }

    /// Column count.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Row count.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Interval of the element at (`col`, `row`).
    pub fn get(&self, col: usize, row: usize) -> Option<&Interval> {
        if col < self.cols && row < self.rows {
            self.elements.get(col * self.rows + row)
        } else {
            None
        }
    }

    /// Column-major element intervals.
    pub fn elements(&self) -> &[Interval] {
        &self.elements
    }
}

/// Whether inputs are constant-folded at shader creation or computed at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EvaluationMode {
    /// Constant expression, evaluated by the shader compiler.
    Const,
    /// Runtime expression, evaluated on the device.
    NonConst,
}

impl EvaluationMode {
    /// Both modes.
    pub const ALL: [Self; 2] = [Self::Const, Self::NonConst];

    /// Suffix used in case keys.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Const => CONST_SUFFIX,
            Self::NonConst => NON_CONST_SUFFIX,
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// What a case accepts as the result of its operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Expectation {
    /// A scalar result inside an interval.
    Interval(Interval),
    /// A vector result, component-wise inside intervals.
    Vector(IntervalVector),
    /// A matrix result, element-wise inside intervals.
    Matrix(IntervalMatrix),
    /// A scalar result whose encoding is one of a finite set (sorted, unique).
    BitSet(Vec<u64>),
}

impl Expectation {
    /// Bit-set expectation; the encodings are sorted and de-duplicated.
    pub fn bit_set(bits: impl IntoIterator<Item = u64>) -> Self {
        let mut bits: Vec<u64> = bits.into_iter().collect();
        bits.sort_unstable();
        bits.dedup();
        Self::BitSet(bits)
    }

    /// Whether every accepted result is a finite value of `format`.
    pub fn is_finite(&self, format: &FloatFormat) -> bool {
        match self {
            Self::Interval(interval) => interval.is_finite(),
            Self::Vector(vector) => vector.components().iter().all(Interval::is_finite),
            Self::Matrix(matrix) => matrix.elements().iter().all(Interval::is_finite),
            Self::BitSet(bits) => bits.iter().all(|&bits| {
                !matches!(format.classify(bits), FloatClass::Infinite | FloatClass::Nan)
            }),
        }
    }

    /// Whether `actual`, a result computed in `format`, satisfies this expectation.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::case::Value;
    /// use fpcases_core::format::BINARY32;
    /// use fpcases_core::interval::{Expectation, Interval};
    ///
    /// let expected = Expectation::Interval(Interval::new(1.0, 2.0));
    /// assert!(expected.accepts(&Value::Scalar(1.5), &BINARY32));
    /// assert!(!expected.accepts(&Value::Scalar(f64::NAN), &BINARY32));
    ///
    /// let zeros = Expectation::bit_set([0x0000_0000, 0x8000_0000]);
    /// assert!(zeros.accepts(&Value::Scalar(-0.0), &BINARY32));
    /// ```
    pub fn accepts(&self, actual: &Value, format: &FloatFormat) -> bool {
        match (self, actual) {
            (Self::Interval(interval), Value::Scalar(value)) => interval.contains(*value),
            (Self::Vector(vector), Value::Vector(values)) => vector.contains(values),
            (Self::Matrix(matrix), Value::Matrix(values)) => {
                matrix.cols() == values.cols()
                    && matrix.rows() == values.rows()
                    && matrix
                        .elements()
                        .iter()
                        .zip(values.elements())
                        .all(|(interval, &value)| interval.contains(value))
            }
            (Self::BitSet(bits), Value::Scalar(value)) => {
                format.is_representable(*value)
                    && bits
                        .binary_search(&format.from_f64(*value, RoundingMode::Rne))
                        .is_ok()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interval(interval) => write!(f, "{interval}"),
            Self::Vector(vector) => {
                write!(f, "(")?;
                for (index, interval) in vector.components().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{interval}")?;
                }
                write!(f, ")")
            }
            Self::Matrix(matrix) => {
                write!(f, "mat{}x{}[", matrix.cols(), matrix.rows())?;
                for (index, interval) in matrix.elements().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{interval}")?;
                }
                write!(f, "]")
            }
            Self::BitSet(bits) => {
                write!(f, "{{")?;
                for (index, bits) in bits.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{bits:#x}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
