//! Representative input samples.
//!
//! Every sample set is a pure function of the precision and the
//! [`RangeConfig`]: the same arguments always give the same sequence.
//! Samples are carried as `f64` values that are exactly representable in the
//! requested precision.
//!
//! The generator offers:
//! 1. **Boundary values:** zeros, subnormal and normal limits, the neighbours
//!    of one, the largest finite value, infinities and NaN.
//! 2. **Full range:** the boundaries plus a geometric sweep of normals and a
//!    linear sweep of subnormals, both signs.
//! 3. **Sparse range:** a short list of magnitudes for cartesian products.
//! 4. **Composites:** vectors and matrices drawn from the sparse range.

use std::cmp::Ordering;

use crate::case::Matrix;
use crate::common::Result;
use crate::config::RangeConfig;
use crate::format::{FloatFormat, Precision, RoundingMode};

/// Component stride for vectors, coprime with the sparse range length.
const VECTOR_STRIDE: usize = 5;

/// Element stride for matrices, coprime with the sparse range length.
const MATRIX_STRIDE: usize = 3;

/// Sample set generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeGenerator {
    config: RangeConfig,
}

impl RangeGenerator {
    /// Creates a generator with the given sweep sizes.
    pub const fn new(config: RangeConfig) -> Self {
        Self { config }
    }

    /// Sweep sizes in use.
    pub const fn config(&self) -> &RangeConfig {
        &self.config
    }

    /// Edge values of the format, ascending, NaN last.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::range::RangeGenerator;
    /// use fpcases_core::Precision;
    ///
    /// let values = RangeGenerator::default().boundary_values(Precision::F16);
    /// assert_eq!(values.first(), Some(&f64::NEG_INFINITY));
    /// assert!(values.contains(&65504.0));
    /// assert!(values.last().is_some_and(|v| v.is_nan()));
    /// ```
    pub fn boundary_values(&self, precision: Precision) -> Vec<f64> {
        let positives = Self::positive_boundaries(precision.format());
        let mut values = Vec::with_capacity(2 * positives.len() + 5);
        values.push(f64::NEG_INFINITY);
        values.extend(positives.iter().rev().map(|value| -value));
        values.extend([-0.0, 0.0]);
        values.extend(&positives);
        values.extend([f64::INFINITY, f64::NAN]);
        values
    }

    fn positive_boundaries(format: &FloatFormat) -> Vec<f64> {
        vec![
            format.min_subnormal(),
            format.max_subnormal(),
            format.min_normal(),
            format.next_down(1.0),
            1.0,
            format.next_up(1.0),
            format.max_finite(),
        ]
    }

    /// Boundary values plus geometric and linear sweeps of both signs.
    ///
    /// Sorted ascending by total order (−0 before +0), de-duplicated by
    /// bit-pattern, NaN last.
    pub fn full_range(&self, precision: Precision) -> Vec<f64> {
        let format = precision.format();
        let mut positives = self.normal_sweep(format);
        positives.extend(self.subnormal_sweep(format));
        positives.extend(Self::positive_boundaries(format));

        let mut values: Vec<f64> = positives.iter().map(|value| -value).collect();
        values.extend(&positives);
        values.extend([-0.0, 0.0, f64::NEG_INFINITY, f64::INFINITY, f64::NAN]);
        values.sort_by(f64::total_cmp);
        values.dedup_by(|a, b| a.to_bits() == b.to_bits());
        values
    }

    /// [`full_range`](Self::full_range) without infinities and NaN.
    pub fn finite_range(&self, precision: Precision) -> Vec<f64> {
        self.full_range(precision)
            .into_iter()
            .filter(|value| value.is_finite())
            .collect()
    }

    /// A short, ascending list of magnitudes spanning the format.
    pub fn sparse_range(&self, precision: Precision) -> Vec<f64> {
        let format = precision.format();
        let positives = [
            format.min_subnormal(),
            format.min_normal(),
            format.quantize(0.1),
            1.0,
            10.0,
            format.max_finite(),
        ];
        let mut values: Vec<f64> = positives.iter().rev().map(|value| -value).collect();
        values.push(0.0);
        values.extend(positives);
        values
    }

    /// Vectors of `dimension` components, one per sparse value.
    ///
    /// Vector `i` takes component `j` from the sparse range at
    /// `i + j * VECTOR_STRIDE`, so every value appears in every position.
    pub fn vector_range(&self, precision: Precision, dimension: usize) -> Vec<Vec<f64>> {
        let sparse = self.sparse_range(precision);
        (0..sparse.len())
            .map(|i| {
                (0..dimension)
                    .map(|j| sparse[(i + j * VECTOR_STRIDE) % sparse.len()])
                    .collect()
            })
            .collect()
    }

    /// `cols`×`rows` matrices, one per sparse value.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedShape`](crate::Error::MalformedShape) for a zero dimension.
    pub fn matrix_range(&self, precision: Precision, cols: usize, rows: usize) -> Result<Vec<Matrix>> {
        let sparse = self.sparse_range(precision);
        (0..sparse.len())
            .map(|i| {
                let elements = (0..cols * rows)
                    .map(|e| sparse[(i + e * MATRIX_STRIDE) % sparse.len()])
                    .collect();
                Matrix::from_column_major(cols, rows, elements)
            })
            .collect()
    }

    /// Caller literals as written, followed by the full range.
    ///
    /// Duplicates are kept. Literals are left unrounded: a case builder rounds
    /// each one to the precision, and a const table may fold the literal at
    /// higher precision first.
    pub fn with_literals(&self, precision: Precision, literals: &[f64]) -> Vec<f64> {
        literals
            .iter()
            .copied()
            .chain(self.full_range(precision))
            .collect()
    }

    /// `normal_count` positive normals spaced evenly in log2 between the
    /// smallest normal and the largest finite value, both included.
    fn normal_sweep(&self, format: &FloatFormat) -> Vec<f64> {
        let count = self.config.normal_count;
        let low = format.min_normal();
        let high = format.max_finite();
        if count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return vec![low];
        }
        let (log_low, log_high) = (low.log2(), high.log2());
        let steps = (count - 1) as f64;
        (0..count)
            .map(|i| match i {
                0 => low,
                _ if i == count - 1 => high,
                _ => {
                    let sample = (log_low + (log_high - log_low) * i as f64 / steps).exp2();
                    let snapped = format.quantize_with(sample, RoundingMode::Rdn);
                    match snapped.partial_cmp(&high) {
                        Some(Ordering::Less | Ordering::Equal) => snapped.max(low),
                        _ => high,
                    }
                }
            })
            .collect()
    }

    /// `subnormal_count` positive subnormals evenly spaced in bit space.
    fn subnormal_sweep(&self, format: &FloatFormat) -> Vec<f64> {
        let count = self.config.subnormal_count as u128;
        let top = u128::from(format.max_subnormal_bits());
        match count {
            0 => Vec::new(),
            1 => vec![format.min_subnormal()],
            _ => (0..count)
                .map(|i| {
                    let bits = 1 + (top - 1) * i / (count - 1);
                    format.to_f64(bits as u64)
                })
                .collect(),
        }
    }
}
