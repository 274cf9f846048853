//! Cases and case tables.
//!
//! A [`Case`] pairs the operands of one evaluation with the [`Expectation`]
//! its result must satisfy. A [`CaseTable`] is the ordered, immutable list of
//! cases produced for one cache key. The builders in [`builders`] turn sample
//! sets into tables in parallel.

/// Parallel table builders.
pub mod builders;
/// Operand values.
pub mod value;

use std::slice;

use crate::format::{FloatFormat, Precision};
use crate::interval::{EvaluationMode, Expectation};

pub use self::builders::{
    binary_cases, matrix_scalar_cases, matrix_vector_cases, unary_cases, vector_matrix_cases,
};
pub use self::value::{Matrix, Value};

/// Operands of one evaluation and the acceptable results.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    /// Operands, left to right.
    pub input: Vec<Value>,
    /// What the result must satisfy.
    pub expected: Expectation,
}

impl Case {
    /// Creates a case.
    pub const fn new(input: Vec<Value>, expected: Expectation) -> Self {
        Self { input, expected }
    }

    /// Whether every operand and every accepted result is finite in `format`.
    pub fn is_finite(&self, format: &FloatFormat) -> bool {
        self.input.iter().all(|value| value.is_finite(format)) && self.expected.is_finite(format)
    }
}

/// Which cases a builder keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFilter {
    /// Drop cases with a non-finite operand or a possibly non-finite result.
    ///
    /// Const evaluation of such a case is a shader-creation error rather
    /// than a value, so const tables use this filter.
    Finite,
    /// Keep every case.
    Unfiltered,
}

impl InputFilter {
    /// Filter used for tables of the given evaluation mode.
    pub const fn for_mode(mode: EvaluationMode) -> Self {
        match mode {
            EvaluationMode::Const => Self::Finite,
            EvaluationMode::NonConst => Self::Unfiltered,
        }
    }

    /// Whether `case` passes the filter.
    pub fn keeps(self, case: &Case, format: &FloatFormat) -> bool {
        match self {
            Self::Finite => case.is_finite(format),
            Self::Unfiltered => true,
        }
    }
}

/// Ordered, immutable cases for one operation, precision and mode.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseTable {
    precision: Precision,
    mode: EvaluationMode,
    cases: Vec<Case>,
}

impl CaseTable {
    /// Wraps generated cases.
    pub const fn new(precision: Precision, mode: EvaluationMode, cases: Vec<Case>) -> Self {
        Self {
            precision,
            mode,
            cases,
        }
    }

    /// Precision the expectations are expressed in.
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Evaluation mode the expectations assume.
    pub const fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// All cases in order.
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the table has no cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case at `index`.
    pub fn get(&self, index: usize) -> Option<&Case> {
        self.cases.get(index)
    }

    /// Iterates over the cases in order.
    pub fn iter(&self) -> slice::Iter<'_, Case> {
        self.cases.iter()
    }
}

impl<'a> IntoIterator for &'a CaseTable {
    type Item = &'a Case;
    type IntoIter = slice::Iter<'a, Case>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
