//! Configuration for range generation, interval evaluation and the catalog.
//!
//! This module defines all configuration structures used to parameterize
//! the crate. It provides:
//! 1. **Defaults:** Baseline sample counts, accumulation policy and catalog contents.
//! 2. **Structures:** `range`, `engine` and `catalog` sections under [`Config`].
//! 3. **Loading:** JSON from a string or a file; every field is optional.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::Result;
use crate::format::Precision;

/// Default configuration constants.
mod defaults {
    use crate::common::constants::DEFAULT_DIMENSIONS;
    use crate::format::Precision;

    /// Normal values sampled per sign by the full-range sweep.
    pub const NORMAL_COUNT: usize = 50;

    /// Subnormal values sampled per sign by the full-range sweep.
    pub const SUBNORMAL_COUNT: usize = 10;

    /// Runtime f16/f32 evaluation may flush subnormals to zero.
    pub const FLUSH_SUBNORMALS: bool = true;

    /// Matrix and vector dimensions registered by the catalog.
    pub fn dimensions() -> Vec<usize> {
        DEFAULT_DIMENSIONS.to_vec()
    }

    /// Precisions registered by the catalog.
    pub fn precisions() -> Vec<Precision> {
        Precision::ALL.to_vec()
    }
}

/// How summations inside dot products are bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Accumulation {
    /// Span every pairing order and widen each partial sum by one ULP.
    ///
    /// Covers implementations that reassociate, fuse or keep extra precision
    /// in intermediate sums.
    #[default]
    Widened,
    /// Span every pairing order with correctly rounded partial sums only.
    Exact,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use fpcases_core::config::{Accumulation, Config};
///
/// let config = Config::default();
/// assert_eq!(config.range.normal_count, 50);
/// assert_eq!(config.engine.accumulation, Accumulation::Widened);
///
/// let json = r#"{ "engine": { "accumulation": "Exact" }, "range": { "normal_count": 8 } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.engine.accumulation, Accumulation::Exact);
/// assert_eq!(config.range.normal_count, 8);
/// assert_eq!(config.range.subnormal_count, 10);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sample set sizes.
    pub range: RangeConfig,
    /// Interval evaluation policy.
    pub engine: EngineConfig,
    /// Tables registered by [`Catalog::register_all`](crate::catalog::Catalog::register_all).
    pub catalog: CatalogConfig,
}

impl Config {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Sample counts for the range generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Geometrically spaced normal values per sign.
    pub normal_count: usize,
    /// Linearly spaced subnormal values per sign.
    pub subnormal_count: usize,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            normal_count: defaults::NORMAL_COUNT,
            subnormal_count: defaults::SUBNORMAL_COUNT,
        }
    }
}

/// Interval evaluation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bound on summation rounding inside dot products.
    pub accumulation: Accumulation,
    /// Accept flushed-to-zero subnormal inputs and results for runtime f16/f32.
    pub flush_subnormals: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            accumulation: Accumulation::default(),
            flush_subnormals: defaults::FLUSH_SUBNORMALS,
        }
    }
}

/// Contents of the standard catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Column/row counts for matrix-vector tables.
    pub dimensions: Vec<usize>,
    /// Precisions to register.
    pub precisions: Vec<Precision>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::dimensions(),
            precisions: defaults::precisions(),
        }
    }
}
