//! Error definitions.
//!
//! Every failure in this crate is structural: all computations are pure and
//! deterministic, so nothing here is retried. Errors fall into four kinds:
//! 1. **Contract violations:** malformed shapes, unsupported operation/format
//!    pairs, duplicate registrations. Detected when a table is registered.
//! 2. **Not found:** a lookup of a key that was never registered.
//! 3. **Domain:** a value outside the finite range of a format, reported only by
//!    the checked encoder. The regular encoder saturates instead.
//! 4. **Configuration:** unreadable or malformed configuration input.

use thiserror::Error;

use crate::catalog::Operation;
use crate::format::Precision;
use crate::interval::{EvaluationMode, Shape};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed dimensions or unsupported combinations. Always fatal.
    ContractViolation,
    /// An unregistered cache key. Signals a wiring bug.
    NotFound,
    /// A value outside a format's representable finite range.
    Domain,
    /// Invalid configuration input.
    Config,
}

/// Errors produced by the format model, engine, cache and catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// Operand shapes whose inner dimensions disagree.
    #[error("dimension mismatch: cannot multiply {lhs} by {rhs}")]
    DimensionMismatch {
        /// Left operand shape.
        lhs: Shape,
        /// Right operand shape.
        rhs: Shape,
    },

    /// A matrix or vector that cannot be constructed as described.
    #[error("malformed shape: {0}")]
    MalformedShape(String),

    /// The operation is not defined for the precision.
    #[error("{operation} is not supported for {precision}")]
    UnsupportedOperation {
        /// Requested operation.
        operation: Operation,
        /// Requested precision.
        precision: Precision,
    },

    /// The evaluation mode is not available for the precision.
    #[error("{mode} evaluation is not available for {precision}")]
    UnsupportedMode {
        /// Requested precision.
        precision: Precision,
        /// Requested evaluation mode.
        mode: EvaluationMode,
    },

    /// An operation name that does not match any known operation.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// A precision name that does not match any known precision.
    #[error("unknown precision `{0}`")]
    UnknownPrecision(String),

    /// A second registration under an existing key.
    #[error("case table `{0}` is already registered")]
    DuplicateKey(String),

    /// A registered generator failed to build its table.
    #[error("case table `{key}` could not be generated: {reason}")]
    Generation {
        /// Key of the failing table.
        key: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Lookup of a key that has no registration.
    #[error("no case table registered under `{0}`")]
    NotFound(String),

    /// A value that does not fit the finite range of a format.
    #[error("{value} is outside the finite range of {precision}")]
    Domain {
        /// Display form of the offending value.
        value: String,
        /// Target precision.
        precision: Precision,
    },

    /// Malformed JSON configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the coarse classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DimensionMismatch { .. }
            | Self::MalformedShape(_)
            | Self::UnsupportedOperation { .. }
            | Self::UnsupportedMode { .. }
            | Self::UnknownOperation(_)
            | Self::UnknownPrecision(_)
            | Self::DuplicateKey(_)
            | Self::Generation { .. } => ErrorKind::ContractViolation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Domain { .. } => ErrorKind::Domain,
            Self::Config(_) | Self::Io(_) => ErrorKind::Config,
        }
    }
}
