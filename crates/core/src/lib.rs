//! Floating-point acceptance envelopes for shader execution tests.
//!
//! This crate computes, for every supported operation and precision, the set of
//! results a conforming implementation may return. It provides:
//! 1. **Format Model:** Bit-level description of f16, f32 and abstract (binary64-stored)
//!    floats, exact decode/encode under the four IEEE rounding directions.
//! 2. **Range Generator:** Deterministic sample sets across each format's range.
//! 3. **Interval Engine:** Correctly rounded, ULP-bounded and accumulation-order
//!    agnostic acceptance intervals computed with exact rational arithmetic.
//! 4. **Cases:** Input/expectation tables built from the generator and the engine.
//! 5. **Case Cache:** Lazily evaluated, memoized tables keyed by operation and format.

/// Common types and constants (errors, key fragments, regression literals).
pub mod common;
/// Configuration (range sizes, accumulation policy, catalog contents).
pub mod config;
/// Floating-point formats, rounding and the exact reference scalar.
pub mod format;
/// Representative input sample generation.
pub mod range;
/// Acceptance intervals and the interval arithmetic engine.
pub mod interval;
/// Case values, expectations and table builders.
pub mod case;
/// Lazily evaluated, memoized case tables.
pub mod cache;
/// Operation catalog and registration of the standard tables.
pub mod catalog;
/// Case cache statistics.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Crate error and result types.
pub use crate::common::{Error, ErrorKind, Result};
/// Process-wide table registry.
pub use crate::cache::CaseCache;
/// Registration of the standard operation tables.
pub use crate::catalog::{CaseKey, Catalog, Operation};
/// Precision selector and format description.
pub use crate::format::{FloatFormat, Precision};
/// Acceptance interval types.
pub use crate::interval::{Expectation, Interval, IntervalEngine};
/// Sample set generation.
pub use crate::range::RangeGenerator;
