//! Common utilities and types shared across the crate.
//!
//! 1. **Error Handling:** The crate error enum and its coarse classification.
//! 2. **Constants:** Key fragments, matrix dimensions and regression literals.

/// Error types and classification.
pub mod error;

/// Common constants used throughout the crate.
pub mod constants;

pub use error::{Error, ErrorKind, Result};
