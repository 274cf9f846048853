//! Interval evaluation context.
//!
//! An [`IntervalEngine`] fixes the three things every acceptance computation
//! depends on:
//! 1. **Precision:** which format results are snapped to.
//! 2. **Evaluation mode:** const evaluation is exact on representable inputs
//!    and never flushes; runtime f16/f32 evaluation may flush subnormal
//!    operands and results to zero.
//! 3. **Engine configuration:** the accumulation policy for dot products.
//!
//! Exact results are computed with big rationals and snapped outward: the low
//! endpoint rounds down and the high endpoint rounds up, so an interval always
//! contains every correctly rounded result under any rounding direction.

use std::fmt;

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::extended::Extended;
use super::{EvaluationMode, Expectation, Interval};
use crate::config::EngineConfig;
use crate::format::{FloatClass, FloatFormat, Precision, RoundingMode, Scalar};

/// Single-operand builtins and operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Smallest integer not less than the operand.
    Ceil,
    /// Largest integer not greater than the operand.
    Floor,
    /// Integer part of the operand.
    Trunc,
    /// Absolute value; bit-exact.
    Abs,
    /// Unary minus; bit-exact.
    Negation,
}

impl UnaryOp {
    /// Whether the result is an integer-rounding of the operand.
    pub const fn is_integer_rounding(self) -> bool {
        matches!(self, Self::Ceil | Self::Floor | Self::Trunc)
    }

    /// Exact result of the operation on `value`.
    ///
    /// The integer roundings pass zeros, infinities and NaN through unchanged
    /// and keep the sign of a negative operand that rounds to zero.
    pub fn apply(self, value: &Scalar) -> Scalar {
        match (self, value) {
            (Self::Negation, _) => -value.clone(),
            (Self::Abs, _) if value.is_sign_negative() => -value.clone(),
            (Self::Abs, _) => value.clone(),
            (_, Scalar::Finite(exact)) => {
                let result = match self {
                    Self::Ceil => exact.ceil(),
                    Self::Floor => exact.floor(),
                    _ => exact.trunc(),
                };
                if result.is_zero() && exact.is_negative() {
                    Scalar::NegativeZero
                } else {
                    Scalar::Finite(result)
                }
            }
            _ => value.clone(),
        }
    }
}

/// Acceptance interval calculator for one precision and evaluation mode.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IntervalEngine {
    precision: Precision,
    mode: EvaluationMode,
    config: EngineConfig,
}

impl fmt::Debug for IntervalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalEngine")
            .field("precision", &self.precision.name())
            .field("mode", &self.mode.suffix())
            .field("accumulation", &self.config.accumulation)
            .field("flushes", &self.flushes())
            .finish()
    }
}

impl IntervalEngine {
    /// Creates an engine.
    ///
    /// # Arguments
    ///
    /// * `precision` - Format results are expressed in.
    /// * `mode` - Const or runtime evaluation.
    /// * `config` - Accumulation and flushing policy.
    pub const fn new(precision: Precision, mode: EvaluationMode, config: EngineConfig) -> Self {
        Self {
            precision,
            mode,
            config,
        }
    }

    /// Precision of the results.
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Evaluation mode.
    pub const fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Accumulation and flushing policy.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Format of the results.
    pub const fn format(&self) -> &'static FloatFormat {
        self.precision.format()
    }

    /// Whether subnormal operands and results may be flushed to zero.
    pub fn flushes(&self) -> bool {
        self.mode == EvaluationMode::NonConst
            && self.config.flush_subnormals
            && self.precision.may_flush_subnormals()
    }

    /// Values an implementation may actually operate on for the input `value`.
    ///
    /// A subnormal input is joined by the zero of each sign when flushing is
    /// allowed.
    pub fn input_variants(&self, value: f64) -> Vec<f64> {
        if self.flushes() && self.format().is_subnormal(value) {
            vec![value, 0.0, -0.0]
        } else {
            vec![value]
        }
    }

    /// Interval covering every variant of a single operand.
    pub fn operand(&self, value: f64) -> Interval {
        if value.is_nan() {
            return Interval::nan();
        }
        let value = self.format().quantize(value);
        let variants: Vec<Interval> = self
            .input_variants(value)
            .into_iter()
            .map(Interval::point)
            .collect();
        Interval::span_all(&variants).unwrap_or_else(|| Interval::point(value))
    }

    fn round_endpoint(&self, value: &Extended, mode: RoundingMode) -> f64 {
        match value {
            Extended::NegativeInfinity => f64::NEG_INFINITY,
            Extended::PositiveInfinity => f64::INFINITY,
            Extended::Finite(exact) => {
                let format = self.format();
                format.to_f64(format.round(exact, mode))
            }
        }
    }

    /// Smallest interval of this format containing `[low, high]`.
    ///
    /// Endpoints round outward; a finite endpoint may overflow to infinity.
    pub(crate) fn envelope(&self, low: &Extended, high: &Extended) -> Interval {
        let low = self.round_endpoint(low, RoundingMode::Rdn);
        let high = self.round_endpoint(high, RoundingMode::Rup);
        self.flush_result(Interval::new(low, high))
    }

    /// Admits a flushed zero when either endpoint is subnormal.
    pub(crate) fn flush_result(&self, interval: Interval) -> Interval {
        if !self.flushes() {
            return interval;
        }
        let format = self.format();
        match interval.bounds() {
            Some((low, high)) if format.is_subnormal(low) || format.is_subnormal(high) => {
                interval.span(&Interval::point(0.0))
            }
            _ => interval,
        }
    }

    /// Interval of the correctly rounded results of an exact value.
    ///
    /// NaN accepts anything; infinities are accepted exactly.
    pub fn correctly_rounded(&self, exact: &Scalar) -> Interval {
        match Extended::from_scalar(exact) {
            None => Interval::any(),
            Some(value) => self.envelope(&value, &value),
        }
    }

    /// Widens each finite endpoint by `ulps` units in the last place at that
    /// endpoint, then snaps outward.
    pub fn widen_ulps(&self, interval: &Interval, ulps: &BigRational) -> Interval {
        let Some((low, high)) = interval.bounds() else {
            return *interval;
        };
        let format = self.format();
        let widen = |value: f64, direction: i8| -> Extended {
            match Extended::from_f64(value) {
                Some(Extended::Finite(exact)) => {
                    let offset = format.ulp(&exact) * ulps;
                    Extended::Finite(if direction < 0 { exact - offset } else { exact + offset })
                }
                Some(other) => other,
                None => Extended::zero(),
            }
        };
        let widened = self.envelope(&widen(low, -1), &widen(high, 1));
        if interval.accepts_nan() { widened.with_nan() } else { widened }
    }

    /// Extends both finite endpoints to the neighbouring value of this format.
    pub fn widen_one_ulp(&self, interval: &Interval) -> Interval {
        let Some((low, high)) = interval.bounds() else {
            return *interval;
        };
        let format = self.format();
        let low = if low.is_finite() { format.next_down(low) } else { low };
        let high = if high.is_finite() { format.next_up(high) } else { high };
        let widened = self.flush_result(Interval::new(low, high));
        if interval.accepts_nan() { widened.with_nan() } else { widened }
    }

    /// Value a unary case of `op` records as input for `literal`.
    ///
    /// Const integer-rounding cases keep a finite literal as written, because
    /// their expectation also covers folding the unrounded literal. Every
    /// other case records the literal rounded to nearest in this precision.
    pub fn literal_input(&self, op: UnaryOp, literal: f64) -> f64 {
        if self.mode == EvaluationMode::Const && op.is_integer_rounding() && literal.is_finite() {
            literal
        } else {
            self.format().quantize(literal)
        }
    }

    /// Expectation for a unary operation applied to a caller literal.
    ///
    /// The operation is evaluated on `literal` rounded to nearest in this
    /// precision. For const evaluation of a literal that is not representable,
    /// the result of the operation on the unrounded literal is accepted as
    /// well, since a compiler may fold the literal at higher precision. Pair
    /// it with [`literal_input`](Self::literal_input) for the recorded input.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::config::EngineConfig;
    /// use fpcases_core::interval::{EvaluationMode, Expectation, Interval, IntervalEngine, UnaryOp};
    /// use fpcases_core::Precision;
    ///
    /// let engine = IntervalEngine::new(Precision::F32, EvaluationMode::NonConst, EngineConfig::default());
    /// assert_eq!(engine.unary(UnaryOp::Ceil, 1.1), Expectation::Interval(Interval::point(2.0)));
    /// assert_eq!(engine.unary(UnaryOp::Ceil, 1.0), Expectation::Interval(Interval::point(1.0)));
    /// ```
    pub fn unary(&self, op: UnaryOp, literal: f64) -> Expectation {
        let input = self.format().quantize(literal);
        if !op.is_integer_rounding() {
            return self.sign_operation(op, input);
        }
        let mut result = self.integer_rounding(op, input);
        if self.mode == EvaluationMode::Const && literal.is_finite() && input != literal {
            let unrounded = op.apply(&Scalar::from_f64(literal));
            result = result.span(&self.correctly_rounded(&unrounded));
        }
        Expectation::Interval(result)
    }

    /// Acceptance interval of `ceil(value)`.
    pub fn ceil(&self, value: f64) -> Interval {
        self.integer_rounding(UnaryOp::Ceil, value)
    }

    /// Acceptance interval of `floor(value)`.
    pub fn floor(&self, value: f64) -> Interval {
        self.integer_rounding(UnaryOp::Floor, value)
    }

    /// Acceptance interval of `trunc(value)`.
    pub fn trunc(&self, value: f64) -> Interval {
        self.integer_rounding(UnaryOp::Trunc, value)
    }

    /// Acceptable encodings of `abs(value)`.
    pub fn abs(&self, value: f64) -> Expectation {
        self.sign_operation(UnaryOp::Abs, value)
    }

    /// Acceptable encodings of `-value`.
    pub fn negation(&self, value: f64) -> Expectation {
        self.sign_operation(UnaryOp::Negation, value)
    }

    fn integer_rounding(&self, op: UnaryOp, value: f64) -> Interval {
        let value = self.format().quantize(value);
        let results: Vec<Interval> = self
            .input_variants(value)
            .into_iter()
            .map(|variant| self.correctly_rounded(&op.apply(&Scalar::from_f64(variant))))
            .collect();
        Interval::span_all(&results).unwrap_or_else(Interval::any)
    }

    /// Bit-exact sign manipulation. Zero results accept both signs.
    fn sign_operation(&self, op: UnaryOp, value: f64) -> Expectation {
        if value.is_nan() {
            return Expectation::Interval(Interval::any());
        }
        let format = self.format();
        let sign = format.sign_mask();
        let mut accepted = Vec::new();
        for variant in self.input_variants(format.quantize(value)) {
            let bits = format.from_f64(variant, RoundingMode::Rne);
            let result = match op {
                UnaryOp::Negation => bits ^ sign,
                _ => bits & !sign,
            };
            if format.classify(result) == FloatClass::Zero {
                accepted.extend([0, sign]);
            } else {
                accepted.push(result);
            }
        }
        Expectation::bit_set(accepted)
    }
}
