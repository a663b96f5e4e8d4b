//! Error types for kernel mapping operations.

use thiserror::Error;

/// Errors raised while building or applying a kernel mapper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// An input or output dimension was zero.
    #[error("{name} must be a positive integer, got {value}")]
    InvalidDimension { name: &'static str, value: usize },

    /// The bandwidth was zero, negative, NaN or infinite.
    #[error("stddev must be a positive finite number, got {value}")]
    InvalidStddev { value: f64 },

    /// The RBF gamma was zero, negative, NaN or infinite.
    #[error("gamma must be a positive finite number, got {value}")]
    InvalidGamma { value: f64 },

    /// A feature vector did not have the configured input dimension.
    #[error("dimension mismatch: expected input of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// One row of a batch did not have the configured input dimension.
    #[error("dimension mismatch in batch row {row}: expected length {expected}, got {actual}")]
    BatchDimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A mapper stack was used before any mapper was added to it.
    #[error("mapper stack is empty")]
    EmptyStack,
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors from a kernel-mapped estimator: either the mapping failed before the
/// estimator was reached, or the estimator itself failed.
#[derive(Debug, Error)]
pub enum PipelineError<E>
where
    E: std::error::Error + 'static,
{
    #[error("feature mapping failed: {0}")]
    Mapping(#[from] KernelError),

    #[error("estimator failed: {0}")]
    Estimator(#[source] E),
}
