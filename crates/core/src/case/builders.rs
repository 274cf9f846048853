//! Case table builders.
//!
//! Each builder maps a sample set through an [`IntervalEngine`] on the rayon
//! pool. Collection preserves input order, so a table is identical no matter
//! how many threads computed it. Operands are rounded to the engine's
//! precision before evaluation, and the rounded values are what the case
//! records as input. Const integer-rounding cases are the exception: they
//! record the literal as written.

use rayon::prelude::*;

use super::{Case, InputFilter, Matrix, Value};
use crate::common::Result;
use crate::interval::{BinaryOp, Expectation, IntervalEngine, UnaryOp};

/// One case per literal for a unary operation.
///
/// # Arguments
///
/// * `engine` - Evaluation context.
/// * `op` - Operation to evaluate.
/// * `literals` - Operand literals; duplicates yield duplicate cases.
/// * `filter` - Which cases to keep.
pub fn unary_cases(
    engine: &IntervalEngine,
    op: UnaryOp,
    literals: &[f64],
    filter: InputFilter,
) -> Vec<Case> {
    let format = engine.format();
    literals
        .par_iter()
        .filter_map(|&literal| {
            let input = engine.literal_input(op, literal);
            let case = Case::new(vec![Value::Scalar(input)], engine.unary(op, literal));
            filter.keeps(&case, format).then_some(case)
        })
        .collect()
}

/// One case per element of `lhs × rhs` (cartesian, `lhs`-major).
pub fn binary_cases(
    engine: &IntervalEngine,
    op: BinaryOp,
    lhs: &[f64],
    rhs: &[f64],
    filter: InputFilter,
) -> Vec<Case> {
    let format = engine.format();
    lhs.par_iter()
        .flat_map_iter(|&a| rhs.iter().map(move |&b| (a, b)))
        .filter_map(|(a, b)| {
            let (a, b) = (format.quantize(a), format.quantize(b));
            let expected = Expectation::Interval(engine.binary(op, a, b));
            let case = Case::new(vec![Value::Scalar(a), Value::Scalar(b)], expected);
            filter.keeps(&case, format).then_some(case)
        })
        .collect()
}

/// One `matrix * vector` case per element of `matrices × vectors`.
///
/// # Errors
///
/// The first dimension mismatch between a matrix and a vector.
pub fn matrix_vector_cases(
    engine: &IntervalEngine,
    matrices: &[Matrix],
    vectors: &[Vec<f64>],
    filter: InputFilter,
) -> Result<Vec<Case>> {
    let format = engine.format();
    let cases = matrices
        .par_iter()
        .flat_map_iter(|matrix| vectors.iter().map(move |vector| (matrix, vector)))
        .map(|(matrix, vector)| -> Result<Option<Case>> {
            let matrix = matrix.map(|x| format.quantize(x));
            let vector: Vec<f64> = vector.iter().map(|&x| format.quantize(x)).collect();
            let expected = Expectation::Vector(engine.matrix_vector(&matrix, &vector)?);
            let case = Case::new(vec![Value::Matrix(matrix), Value::Vector(vector)], expected);
            Ok(filter.keeps(&case, format).then_some(case))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(cases.into_iter().flatten().collect())
}

/// One `vector * matrix` case per element of `vectors × matrices`.
///
/// # Errors
///
/// The first dimension mismatch between a vector and a matrix.
pub fn vector_matrix_cases(
    engine: &IntervalEngine,
    vectors: &[Vec<f64>],
    matrices: &[Matrix],
    filter: InputFilter,
) -> Result<Vec<Case>> {
    let format = engine.format();
    let cases = vectors
        .par_iter()
        .flat_map_iter(|vector| matrices.iter().map(move |matrix| (vector, matrix)))
        .map(|(vector, matrix)| -> Result<Option<Case>> {
            let vector: Vec<f64> = vector.iter().map(|&x| format.quantize(x)).collect();
            let matrix = matrix.map(|x| format.quantize(x));
            let expected = Expectation::Vector(engine.vector_matrix(&vector, &matrix)?);
            let case = Case::new(vec![Value::Vector(vector), Value::Matrix(matrix)], expected);
            Ok(filter.keeps(&case, format).then_some(case))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(cases.into_iter().flatten().collect())
}

/// One `matrix * scalar` case per element of `matrices × scalars`.
pub fn matrix_scalar_cases(
    engine: &IntervalEngine,
    matrices: &[Matrix],
    scalars: &[f64],
    filter: InputFilter,
) -> Vec<Case> {
    let format = engine.format();
    matrices
        .par_iter()
        .flat_map_iter(|matrix| scalars.iter().map(move |&scalar| (matrix, scalar)))
        .filter_map(|(matrix, scalar)| {
            let matrix = matrix.map(|x| format.quantize(x));
            let scalar = format.quantize(scalar);
            let expected = Expectation::Matrix(engine.matrix_scalar(&matrix, scalar));
            let case = Case::new(vec![Value::Matrix(matrix), Value::Scalar(scalar)], expected);
            filter.keeps(&case, format).then_some(case)
        })
        .collect()
}
