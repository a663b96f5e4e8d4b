//! Explicit kernel methods: map dense features with random Fourier features,
//! then hand them to a linear classifier.

pub mod common_types;
pub mod error;
pub mod estimator;
pub mod kernels;

pub use common_types::{DataPoint, Metrics};
pub use error::{KernelError, PipelineError, Result};
pub use estimator::{Estimator, EvaluationReport, KernelMappedEstimator};
pub use kernels::{
    KernelMapper, MapperStack, RandomFourierFeatures, RffConfig, gamma_from_stddev, rbf_kernel,
    stddev_from_gamma,
};

// --- Python bindings (built with `--features python`, e.g. through maturin) ---
#[cfg(feature = "python")]
mod python {
    use crate::error::KernelError;
    use crate::kernels::{self, RandomFourierFeatures, RffConfig};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    impl From<KernelError> for PyErr {
        fn from(err: KernelError) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    /// Python-facing Random Fourier Feature mapper (f64 only).
    #[pyclass(name = "RandomFourierFeatures", frozen)]
    struct PyRandomFourierFeatures {
        inner: RandomFourierFeatures<f64>,
    }

    #[pymethods]
    impl PyRandomFourierFeatures {
        #[new]
        #[pyo3(signature = (input_dim, output_dim, stddev, seed = None))]
        fn new(input_dim: usize, output_dim: usize, stddev: f64, seed: Option<u64>) -> PyResult<Self> {
            let mut config = RffConfig::new(input_dim, output_dim, stddev);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            Ok(PyRandomFourierFeatures {
                inner: RandomFourierFeatures::new(&config)?,
            })
        }

        fn map(&self, features: Vec<f64>) -> PyResult<Vec<f64>> {
            Ok(self.inner.map(&features)?)
        }

        fn map_batch(&self, rows: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
            Ok(self.inner.map_batch(&rows)?)
        }

        fn approximate_kernel(&self, x: Vec<f64>, y: Vec<f64>) -> PyResult<f64> {
            Ok(self.inner.approximate_kernel(&x, &y)?)
        }

        #[getter]
        fn input_dim(&self) -> usize {
            self.inner.input_dim()
        }

        #[getter]
        fn output_dim(&self) -> usize {
            self.inner.output_dim()
        }

        #[getter]
        fn stddev(&self) -> f64 {
            self.inner.stddev()
        }
    }

    /// Exact RBF kernel between two vectors of f64.
    #[pyfunction]
    fn rbf_kernel(x: Vec<f64>, y: Vec<f64>, stddev: f64) -> PyResult<f64> {
        Ok(kernels::rbf_kernel(&x, &y, stddev)?)
    }

    #[pyfunction]
    fn gamma_from_stddev(stddev: f64) -> PyResult<f64> {
        Ok(kernels::gamma_from_stddev(stddev)?)
    }

    /// The name of this function must match the `lib.name` in `Cargo.toml`.
    #[pymodule]
    fn kernel_methods(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(rbf_kernel, m)?)?;
        m.add_function(wrap_pyfunction!(gamma_from_stddev, m)?)?;
        m.add_class::<PyRandomFourierFeatures>()?;
        Ok(())
    }
}
