//! Explicit kernel mappings and the exact kernels they approximate.

pub mod random_fourier;
pub mod stack;

pub use random_fourier::{RandomFourierFeatures, RffConfig};
pub use stack::MapperStack;

use crate::error::{KernelError, Result};
use num_traits::Float;

/// A dense feature mapping `R^d -> R^D` whose inner products approximate a kernel.
///
/// Implementors are immutable once built: `map` takes `&self` and must not
/// change any state, so one mapper can serve many threads.
pub trait KernelMapper<F: Float> {
    /// Short human-readable identifier, used in logs.
    fn name(&self) -> &str;

    /// Length every input vector must have.
    fn input_dim(&self) -> usize;

    /// Length of every mapped vector.
    fn output_dim(&self) -> usize;

    /// Maps one feature vector. Fails with `DimensionMismatch` when
    /// `features.len() != self.input_dim()`.
    fn map(&self, features: &[F]) -> Result<Vec<F>>;

    /// Maps every row of a batch. The first row with the wrong length fails the
    /// whole batch with `BatchDimensionMismatch`.
    fn map_batch(&self, rows: &[Vec<F>]) -> Result<Vec<Vec<F>>> {
        map_rows(self, rows)
    }
}

/// Row-by-row batch mapping shared by the `KernelMapper` implementations.
pub(crate) fn map_rows<F, M>(mapper: &M, rows: &[Vec<F>]) -> Result<Vec<Vec<F>>>
where
    F: Float,
    M: KernelMapper<F> + ?Sized,
{
    tracing::trace!(mapper = mapper.name(), rows = rows.len(), "mapping batch");
    let expected = mapper.input_dim();
    rows.iter()
        .enumerate()
        .map(|(row, features)| {
            if features.len() != expected {
                return Err(KernelError::BatchDimensionMismatch {
                    row,
                    expected,
                    actual: features.len(),
                });
            }
            mapper.map(features)
        })
        .collect()
}

pub(crate) fn validate_stddev<F: Float>(stddev: F) -> Result<()> {
    // `!(x > 0)` also rejects NaN
    if !(stddev > F::zero()) || !stddev.is_finite() {
        return Err(KernelError::InvalidStddev {
            value: stddev.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

fn squared_distance<F: Float>(x: &[F], y: &[F]) -> F {
    x.iter().zip(y.iter()).fold(F::zero(), |acc, (&a, &b)| {
        let diff = a - b;
        acc + diff * diff
    })
}

/// Exact Gaussian (RBF) kernel: `exp(-||x - y||^2 / (2 * stddev^2))`.
pub fn rbf_kernel<F: Float>(x: &[F], y: &[F], stddev: F) -> Result<F> {
    validate_stddev(stddev)?;
    if x.len() != y.len() {
        return Err(KernelError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let gamma = gamma_from_stddev(stddev)?;
    Ok((-gamma * squared_distance(x, y)).exp())
}

/// Converts a bandwidth into the `gamma` of the `exp(-gamma * ||x - y||^2)` form.
pub fn gamma_from_stddev<F: Float>(stddev: F) -> Result<F> {
    validate_stddev(stddev)?;
    let two = F::one() + F::one();
    Ok(F::one() / (two * stddev * stddev))
}

/// Inverse of [`gamma_from_stddev`].
pub fn stddev_from_gamma<F: Float>(gamma: F) -> Result<F> {
    if !(gamma > F::zero()) || !gamma.is_finite() {
        return Err(KernelError::InvalidGamma {
            value: gamma.to_f64().unwrap_or(f64::NAN),
        });
    }
    let two = F::one() + F::one();
    Ok((F::one() / (two * gamma)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rbf_kernel_identical_points() {
        let x = vec![1.0, -2.0, 3.5];
        let k = rbf_kernel(&x, &x, 2.0).unwrap();
        assert!((k - 1.0).abs() < 1e-12, "k(x, x) should be 1, got {}", k);
    }

    #[test]
    fn test_rbf_kernel_known_value() {
        // ||x - y||^2 = 1, stddev = 5 => exp(-1/50)
        let k = rbf_kernel(&[0.0, 0.0], &[1.0, 0.0], 5.0).unwrap();
        let expected = (-1.0_f64 / 50.0).exp();
        assert!((k - expected).abs() < 1e-12, "Expected {}, got {}", expected, k);
    }

    #[test]
    fn test_rbf_kernel_decreases_with_distance() {
        let origin = [0.0_f32, 0.0];
        let near = rbf_kernel(&origin, &[0.5, 0.0], 1.0).unwrap();
        let far = rbf_kernel(&origin, &[2.0, 0.0], 1.0).unwrap();
        assert!(near > far);
    }

    #[test]
    fn test_rbf_kernel_dimension_mismatch() {
        let err = rbf_kernel(&[0.0, 1.0], &[1.0], 1.0).unwrap_err();
        assert_eq!(err, KernelError::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_rbf_kernel_rejects_bad_stddev() {
        assert!(matches!(rbf_kernel(&[0.0], &[1.0], 0.0), Err(KernelError::InvalidStddev { .. })));
        assert!(matches!(rbf_kernel(&[0.0], &[1.0], -1.0), Err(KernelError::InvalidStddev { .. })));
        assert!(matches!(rbf_kernel(&[0.0], &[1.0], f64::NAN), Err(KernelError::InvalidStddev { .. })));
        assert!(matches!(rbf_kernel(&[0.0], &[1.0], f64::INFINITY), Err(KernelError::InvalidStddev { .. })));
    }

    #[test]
    fn test_gamma_stddev_conversions() {
        let gamma = gamma_from_stddev(5.0).unwrap();
        assert!((gamma - 0.02).abs() < 1e-12);
        let stddev = stddev_from_gamma(gamma).unwrap();
        assert!((stddev - 5.0).abs() < 1e-9);
        assert!(matches!(stddev_from_gamma(0.0), Err(KernelError::InvalidGamma { .. })));
    }
}
