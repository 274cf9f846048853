//! Constants shared by the catalog, the range generator and the engine.

use crate::format::Precision;

/// Key suffix for tables whose inputs are constant-foldable.
pub const CONST_SUFFIX: &str = "const";

/// Key suffix for tables whose inputs are computed at runtime.
pub const NON_CONST_SUFFIX: &str = "non_const";

/// Matrix/vector dimensions exercised by default (WGSL `vec2`..`vec4`, `mat2x2`..`mat4x4`).
pub const DEFAULT_DIMENSIONS: [usize; 3] = [2, 3, 4];

/// Smallest supported vector/matrix dimension.
pub const MIN_DIMENSION: usize = 2;

/// Largest supported vector/matrix dimension.
pub const MAX_DIMENSION: usize = 4;

/// Summations up to this many terms are evaluated in every pairing order.
pub const EXHAUSTIVE_ORDER_LIMIT: usize = 4;

/// Summations up to this many terms are spanned by a dynamic program over
/// term subsets. Its cost grows as `3^n`, so longer sums use an error bound.
pub const SUBSET_ORDER_LIMIT: usize = 8;

/// Largest number of terms a dot product accepts.
pub const MAX_DOT_TERMS: usize = 16;

/// Small-magnitude literals exercised by the rounding builtins.
pub const ROUNDING_LITERALS: [f64; 10] = [0.1, 0.9, 1.0, 1.1, 1.9, -0.1, -0.9, -1.0, -1.1, -1.9];

/// Sign-bit-as-integer literal kept as an explicit `ceil` regression input
/// (gpuweb/cts#2766). Interpreted as a plain numeric value in each precision.
pub const fn ceil_regression_literal(precision: Precision) -> f64 {
    match precision {
        Precision::F16 => 32_768.0,
        Precision::F32 => 2_147_483_648.0,
        Precision::Abstract => 9_223_372_036_854_775_808.0,
    }
}
