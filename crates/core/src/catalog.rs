//! Operation catalog and registration of the standard case tables.
//!
//! The catalog turns a [`Config`] into cache registrations. It provides:
//! 1. **Operations:** The closed set of operations with their names and the
//!    precisions each one supports.
//! 2. **Keys:** [`CaseKey`], the structured form of a cache key, formatted as
//!    `{operation}_{precision}[_{operands}]_{const|non_const}`.
//! 3. **Registration:** Eager validation of every operation, precision, mode
//!    and shape, followed by registration of a lazy generator.
//!
//! Compound assignment (`*=`) computes exactly what the binary operator does,
//! so it consumes the square `vector * matrix` keys rather than having its own.

use std::fmt;
use std::str::FromStr;

use crate::cache::CaseCache;
use crate::case::{
    CaseTable, InputFilter, binary_cases, matrix_scalar_cases, matrix_vector_cases, unary_cases,
    vector_matrix_cases,
};
use crate::common::constants::{
    MAX_DIMENSION, MIN_DIMENSION, ROUNDING_LITERALS, ceil_regression_literal,
};
use crate::common::{Error, Result};
use crate::config::Config;
use crate::format::Precision;
use crate::interval::{BinaryOp, EvaluationMode, IntervalEngine, UnaryOp};
use crate::range::RangeGenerator;

/// Operations with case tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// `ceil(x)`.
    Ceil,
    /// `floor(x)`.
    Floor,
    /// `trunc(x)`.
    Trunc,
    /// `abs(x)`.
    Abs,
    /// `-x`.
    Negation,
    /// `a + b`.
    Addition,
    /// `a - b`.
    Subtraction,
    /// `a * b`, also matrix/vector/scalar products.
    Multiplication,
    /// `a / b`.
    Division,
}

/// How an [`Operation`] is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// One operand.
    Unary(UnaryOp),
    /// Two operands.
    Binary(BinaryOp),
}

impl Operation {
    /// Every operation, in registration order.
    pub const ALL: [Self; 9] = [
        Self::Ceil,
        Self::Floor,
        Self::Trunc,
        Self::Abs,
        Self::Negation,
        Self::Addition,
        Self::Subtraction,
        Self::Multiplication,
        Self::Division,
    ];

    /// Name used in case keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ceil => "ceil",
            Self::Floor => "floor",
            Self::Trunc => "trunc",
            Self::Abs => "abs",
            Self::Negation => "negation",
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
        }
    }

    /// Arity and engine entry point.
    pub const fn kind(self) -> OperationKind {
        match self {
            Self::Ceil => OperationKind::Unary(UnaryOp::Ceil),
            Self::Floor => OperationKind::Unary(UnaryOp::Floor),
            Self::Trunc => OperationKind::Unary(UnaryOp::Trunc),
            Self::Abs => OperationKind::Unary(UnaryOp::Abs),
            Self::Negation => OperationKind::Unary(UnaryOp::Negation),
            Self::Addition => OperationKind::Binary(BinaryOp::Addition),
            Self::Subtraction => OperationKind::Binary(BinaryOp::Subtraction),
            Self::Multiplication => OperationKind::Binary(BinaryOp::Multiplication),
            Self::Division => OperationKind::Binary(BinaryOp::Division),
        }
    }

    /// Whether tables exist for `precision`.
    ///
    /// Abstract division has no accuracy bound to test against.
    pub const fn supports(self, precision: Precision) -> bool {
        !matches!((self, precision), (Self::Division, Precision::Abstract))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_owned()))
    }
}

/// Operand layout of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operands {
    /// Scalar operands only.
    Scalar,
    /// `matCxR * vecC`.
    MatrixVector {
        /// Matrix columns (vector length).
        cols: usize,
        /// Matrix rows (result length).
        rows: usize,
    },
    /// `vecR * matCxR`.
    VectorMatrix {
        /// Matrix columns (result length).
        cols: usize,
        /// Matrix rows (vector length).
        rows: usize,
    },
    /// `matCxR * scalar`.
    MatrixScalar {
        /// Matrix columns.
        cols: usize,
        /// Matrix rows.
        rows: usize,
    },
}

/// Structured cache key.
///
/// # Examples
///
/// ```
/// use fpcases_core::catalog::CaseKey;
/// use fpcases_core::interval::EvaluationMode;
/// use fpcases_core::{Operation, Precision};
///
/// let key = CaseKey::scalar(Operation::Ceil, Precision::F32, EvaluationMode::NonConst);
/// assert_eq!(key.to_string(), "ceil_f32_non_const");
/// let key = CaseKey::matrix_vector(Precision::F32, 2, 3, EvaluationMode::Const);
/// assert_eq!(key.to_string(), "multiplication_f32_mat2x3_vec2_const");
/// let key = CaseKey::vector_matrix(Precision::F32, 2, 3, EvaluationMode::NonConst);
/// assert_eq!(key.to_string(), "multiplication_f32_vec3_mat2x3_non_const");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseKey {
    /// Operation.
    pub operation: Operation,
    /// Precision of operands and results.
    pub precision: Precision,
    /// Operand layout.
    pub operands: Operands,
    /// Evaluation mode.
    pub mode: EvaluationMode,
}

impl CaseKey {
    /// Key of a scalar table.
    pub const fn scalar(operation: Operation, precision: Precision, mode: EvaluationMode) -> Self {
        Self {
            operation,
            precision,
            operands: Operands::Scalar,
            mode,
        }
    }

    /// Key of a `matCxR * vecC` table.
    pub const fn matrix_vector(
        precision: Precision,
        cols: usize,
        rows: usize,
        mode: EvaluationMode,
    ) -> Self {
        Self {
            operation: Operation::Multiplication,
            precision,
            operands: Operands::MatrixVector { cols, rows },
            mode,
        }
    }

    /// Key of a `vecR * matCxR` table.
    pub const fn vector_matrix(
        precision: Precision,
        cols: usize,
        rows: usize,
        mode: EvaluationMode,
    ) -> Self {
        Self {
            operation: Operation::Multiplication,
            precision,
            operands: Operands::VectorMatrix { cols, rows },
            mode,
        }
    }

    /// Key of a `matCxR * scalar` table.
    pub const fn matrix_scalar(
        precision: Precision,
        cols: usize,
        rows: usize,
        mode: EvaluationMode,
    ) -> Self {
        Self {
            operation: Operation::Multiplication,
            precision,
            operands: Operands::MatrixScalar { cols, rows },
            mode,
        }
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_", self.operation, self.precision)?;
        match self.operands {
            Operands::Scalar => {}
            Operands::MatrixVector { cols, rows } => write!(f, "mat{cols}x{rows}_vec{cols}_")?,
            Operands::VectorMatrix { cols, rows } => write!(f, "vec{rows}_mat{cols}x{rows}_")?,
            Operands::MatrixScalar { cols, rows } => write!(f, "mat{cols}x{rows}_scalar_")?,
        }
        write!(f, "{}", self.mode)
    }
}

/// Registers the standard tables described by a [`Config`].
#[derive(Debug, Clone)]
pub struct Catalog {
    config: Config,
}

impl Catalog {
    /// Creates a catalog.
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluation modes available for `precision`: abstract values only exist
    /// at shader-creation time.
    pub fn modes(precision: Precision) -> Vec<EvaluationMode> {
        if precision.supports_runtime() {
            EvaluationMode::ALL.to_vec()
        } else {
            vec![EvaluationMode::Const]
        }
    }

    /// Registers every configured table.
    ///
    /// Validation is eager: the first invalid dimension aborts registration
    /// before any table is generated.
    ///
    /// # Errors
    ///
    /// Contract violations for invalid configured dimensions and
    /// [`Error::DuplicateKey`] when a key already exists in `cache`.
    pub fn register_all(&self, cache: &mut CaseCache) -> Result<Vec<CaseKey>> {
        let dimensions = &self.config.catalog.dimensions;
        for &dimension in dimensions {
            Self::validate_dimensions(dimension, dimension)?;
        }

        let mut keys = Vec::new();
        for &precision in &self.config.catalog.precisions {
            for mode in Self::modes(precision) {
                for operation in Operation::ALL {
                    if !operation.supports(precision) {
                        continue;
                    }
                    keys.push(match operation.kind() {
                        OperationKind::Unary(_) => {
                            self.register_unary(cache, operation, precision, mode)?
                        }
                        OperationKind::Binary(_) => {
                            self.register_binary(cache, operation, precision, mode)?
                        }
                    });
                }
                for &cols in dimensions {
                    for &rows in dimensions {
                        keys.push(self.register_matrix_vector(cache, precision, cols, rows, mode)?);
                        keys.push(self.register_vector_matrix(cache, precision, cols, rows, mode)?);
                        keys.push(self.register_matrix_scalar(cache, precision, cols, rows, mode)?);
                    }
                }
            }
        }
        Ok(keys)
    }

    /// Registers the table of a unary operation.
    ///
    /// Inputs are the operation's literals followed by the full range.
    ///
    /// # Errors
    ///
    /// Contract violations when `operation` is not unary or the
    /// precision/mode pair is unsupported.
    pub fn register_unary(
        &self,
        cache: &mut CaseCache,
        operation: Operation,
        precision: Precision,
        mode: EvaluationMode,
    ) -> Result<CaseKey> {
        Self::validate(operation, precision, mode)?;
        let OperationKind::Unary(op) = operation.kind() else {
            return Err(Error::UnsupportedOperation {
                operation,
                precision,
            });
        };
        let key = CaseKey::scalar(operation, precision, mode);
        let ranges = RangeGenerator::new(self.config.range);
        let engine = IntervalEngine::new(precision, mode, self.config.engine);
        let literals = Self::unary_literals(operation, precision);
        cache.register(key.to_string(), move || {
            let inputs = ranges.with_literals(precision, &literals);
            let cases = unary_cases(&engine, op, &inputs, InputFilter::for_mode(mode));
            Ok(CaseTable::new(precision, mode, cases))
        })?;
        Ok(key)
    }

    /// Registers the table of a scalar binary operator over the sparse range.
    ///
    /// # Errors
    ///
    /// Contract violations when `operation` is not binary or the
    /// operation/precision/mode combination is unsupported.
    pub fn register_binary(
        &self,
        cache: &mut CaseCache,
        operation: Operation,
        precision: Precision,
        mode: EvaluationMode,
    ) -> Result<CaseKey> {
        Self::validate(operation, precision, mode)?;
        let OperationKind::Binary(op) = operation.kind() else {
            return Err(Error::UnsupportedOperation {
                operation,
                precision,
            });
        };
        let key = CaseKey::scalar(operation, precision, mode);
        let ranges = RangeGenerator::new(self.config.range);
        let engine = IntervalEngine::new(precision, mode, self.config.engine);
        cache.register(key.to_string(), move || {
            let values = ranges.sparse_range(precision);
            let cases = binary_cases(&engine, op, &values, &values, InputFilter::for_mode(mode));
            Ok(CaseTable::new(precision, mode, cases))
        })?;
        Ok(key)
    }

    /// Registers `matCxR * vecC`.
    ///
    /// # Errors
    ///
    /// Contract violations for dimensions outside 2..=4 or an unsupported
    /// precision/mode pair.
    pub fn register_matrix_vector(
        &self,
        cache: &mut CaseCache,
        precision: Precision,
        cols: usize,
        rows: usize,
        mode: EvaluationMode,
    ) -> Result<CaseKey> {
        Self::validate(Operation::Multiplication, precision, mode)?;
        Self::validate_dimensions(cols, rows)?;
        let key = CaseKey::matrix_vector(precision, cols, rows, mode);
        let ranges = RangeGenerator::new(self.config.range);
        let engine = IntervalEngine::new(precision, mode, self.config.engine);
        cache.register(key.to_string(), move || {
            let matrices = ranges.matrix_range(precision, cols, rows)?;
            let vectors = ranges.vector_range(precision, cols);
            let cases =
                matrix_vector_cases(&engine, &matrices, &vectors, InputFilter::for_mode(mode))?;
            Ok(CaseTable::new(precision, mode, cases))
        })?;
        Ok(key)
    }

    /// Registers `vecR * matCxR`.
    ///
    /// # Errors
    ///
    /// Contract violations for dimensions outside 2..=4 or an unsupported
    /// precision/mode pair.
    pub fn register_vector_matrix(
        &self,
        cache: &mut CaseCache,
        precision: Precision,
        cols: usize,
        rows: usize,
        mode: EvaluationMode,
    ) -> Result<CaseKey> {
        Self::validate(Operation::Multiplication, precision, mode)?;
        Self::validate_dimensions(cols, rows)?;
        let key = CaseKey::vector_matrix(precision, cols, rows, mode);
        let ranges = RangeGenerator::new(self.config.range);
        let engine = IntervalEngine::new(precision, mode, self.config.engine);
        cache.register(key.to_string(), move || {
            let vectors = ranges.vector_range(precision, rows);
            let matrices = ranges.matrix_range(precision, cols, rows)?;
            let cases =
                vector_matrix_cases(&engine, &vectors, &matrices, InputFilter::for_mode(mode))?;
            Ok(CaseTable::new(precision, mode, cases))
        })?;
        Ok(key)
    }

    /// Registers `matCxR * scalar`.
    ///
    /// # Errors
    ///
    /// Contract violations for dimensions outside 2..=4 or an unsupported
    /// precision/mode pair.
    pub fn register_matrix_scalar(
        &self,
        cache: &mut CaseCache,
        precision: Precision,
        cols: usize,
        rows: usize,
        mode: EvaluationMode,
    ) -> Result<CaseKey> {
        Self::validate(Operation::Multiplication, precision, mode)?;
        Self::validate_dimensions(cols, rows)?;
        let key = CaseKey::matrix_scalar(precision, cols, rows, mode);
        let ranges = RangeGenerator::new(self.config.range);
        let engine = IntervalEngine::new(precision, mode, self.config.engine);
        cache.register(key.to_string(), move || {
            let matrices = ranges.matrix_range(precision, cols, rows)?;
            let scalars = ranges.sparse_range(precision);
            let cases =
                matrix_scalar_cases(&engine, &matrices, &scalars, InputFilter::for_mode(mode));
            Ok(CaseTable::new(precision, mode, cases))
        })?;
        Ok(key)
    }

    /// Literals evaluated ahead of the full range for a unary operation.
    ///
    /// The integer roundings get small magnitudes around ±1; `ceil` also gets
    /// the sign-bit-as-integer regression literal of the precision.
    pub fn unary_literals(operation: Operation, precision: Precision) -> Vec<f64> {
        match operation {
            Operation::Ceil => {
                let mut literals = ROUNDING_LITERALS.to_vec();
                literals.push(ceil_regression_literal(precision));
                literals
            }
            Operation::Floor | Operation::Trunc => ROUNDING_LITERALS.to_vec(),
            _ => Vec::new(),
        }
    }

    fn validate(operation: Operation, precision: Precision, mode: EvaluationMode) -> Result<()> {
        if !operation.supports(precision) {
            return Err(Error::UnsupportedOperation {
                operation,
                precision,
            });
        }
        if !Self::modes(precision).contains(&mode) {
            return Err(Error::UnsupportedMode { precision, mode });
        }
        Ok(())
    }

    fn validate_dimensions(cols: usize, rows: usize) -> Result<()> {
        let supported = MIN_DIMENSION..=MAX_DIMENSION;
        if supported.contains(&cols) && supported.contains(&rows) {
            Ok(())
        } else {
            Err(Error::MalformedShape(format!(
                "mat{cols}x{rows} (dimensions must be {MIN_DIMENSION}..={MAX_DIMENSION})"
            )))
        }
    }
}
