//! The seam to an external classifier, and the adapter that feeds it mapped features.
//!
//! Training loops, optimizers and metric computation live in the estimator;
//! this module only decides what the estimator sees.

use crate::common_types::{DataPoint, Metrics};
use crate::error::{KernelError, PipelineError};
use crate::kernels::KernelMapper;
use num_traits::Float;
use std::fmt;
use tracing::debug;

/// A trainable classifier (linear model, DNN, ...) that is implemented elsewhere.
pub trait Estimator<F, L> {
    type Error: std::error::Error + 'static;

    /// Trains for at most `steps` optimization steps.
    fn fit(&mut self, data: &[DataPoint<F, L>], steps: usize) -> Result<(), Self::Error>;

    /// Computes evaluation metrics, keyed by metric name.
    fn evaluate(&self, data: &[DataPoint<F, L>]) -> Result<Metrics, Self::Error>;
}

/// Wraps an estimator so that every sample goes through a kernel mapper first.
///
/// The wrapped estimator is trained and evaluated on `mapper.output_dim()`-long
/// vectors; labels are passed through untouched.
#[derive(Debug)]
pub struct KernelMappedEstimator<M, E> {
    mapper: M,
    estimator: E,
}

impl<M, E> KernelMappedEstimator<M, E> {
    pub fn new(mapper: M, estimator: E) -> Self {
        KernelMappedEstimator { mapper, estimator }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn into_inner(self) -> (M, E) {
        (self.mapper, self.estimator)
    }
}

impl<M, E> KernelMappedEstimator<M, E> {
    /// Maps every sample's features. Nothing reaches the estimator if any row fails.
    pub fn map_data<F, L>(&self, data: &[DataPoint<F, L>]) -> Result<Vec<DataPoint<F, L>>, KernelError>
    where
        F: Float,
        L: Clone,
        M: KernelMapper<F>,
    {
        let expected = self.mapper.input_dim();
        data.iter()
            .enumerate()
            .map(|(row, point)| {
                if point.dim() != expected {
                    return Err(KernelError::BatchDimensionMismatch {
                        row,
                        expected,
                        actual: point.dim(),
                    });
                }
                let features = self.mapper.map(&point.features)?;
                Ok(DataPoint::new(features, point.label.clone()))
            })
            .collect()
    }
}

impl<F, L, M, E> Estimator<F, L> for KernelMappedEstimator<M, E>
where
    F: Float,
    L: Clone,
    M: KernelMapper<F>,
    E: Estimator<F, L>,
{
    type Error = PipelineError<E::Error>;

    fn fit(&mut self, data: &[DataPoint<F, L>], steps: usize) -> Result<(), Self::Error> {
        let mapped = self.map_data(data)?;
        debug!(
            mapper = self.mapper.name(),
            samples = mapped.len(),
            output_dim = self.mapper.output_dim(),
            steps,
            "fitting on mapped features"
        );
        self.estimator.fit(&mapped, steps).map_err(PipelineError::Estimator)
    }

    fn evaluate(&self, data: &[DataPoint<F, L>]) -> Result<Metrics, Self::Error> {
        let mapped = self.map_data(data)?;
        debug!(mapper = self.mapper.name(), samples = mapped.len(), "evaluating on mapped features");
        self.estimator.evaluate(&mapped).map_err(PipelineError::Estimator)
    }
}

/// Evaluation metrics formatted for printing, one `name: value` line per metric.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    metrics: Metrics,
}

impl EvaluationReport {
    pub fn new(metrics: Metrics) -> Self {
        EvaluationReport { metrics }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl From<Metrics> for EvaluationReport {
    fn from(metrics: Metrics) -> Self {
        EvaluationReport::new(metrics)
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.metrics {
            writeln!(f, "{}: {:.4}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{RandomFourierFeatures, RffConfig};

    #[derive(Debug, thiserror::Error)]
    #[error("recording estimator refused: {0}")]
    struct RefusedError(&'static str);

    /// Records what it was handed instead of training.
    #[derive(Debug, Default)]
    struct RecordingEstimator {
        seen: Vec<DataPoint<f64, u8>>,
        steps: usize,
        refuse: bool,
    }

    impl Estimator<f64, u8> for RecordingEstimator {
        type Error = RefusedError;

        fn fit(&mut self, data: &[DataPoint<f64, u8>], steps: usize) -> Result<(), Self::Error> {
            if self.refuse {
                return Err(RefusedError("fit"));
            }
            self.seen = data.to_vec();
            self.steps = steps;
            Ok(())
        }

        fn evaluate(&self, data: &[DataPoint<f64, u8>]) -> Result<Metrics, Self::Error> {
            if self.refuse {
                return Err(RefusedError("evaluate"));
            }
            let mut metrics = Metrics::new();
            metrics.insert("samples".to_string(), data.len() as f64);
            metrics.insert("feature_dim".to_string(), data.first().map_or(0, |p| p.dim()) as f64);
            Ok(metrics)
        }
    }

    fn mapper() -> RandomFourierFeatures<f64> {
        RandomFourierFeatures::new(&RffConfig::new(2, 64, 1.0).with_seed(4)).unwrap()
    }

    fn training_data() -> Vec<DataPoint<f64, u8>> {
        vec![
            DataPoint::new(vec![0.0, 0.0], 0),
            DataPoint::new(vec![1.0, 1.0], 1),
            DataPoint::new(vec![0.2, -0.4], 0),
        ]
    }

    #[test]
    fn test_fit_hands_mapped_features_to_estimator() {
        let data = training_data();
        let mut model = KernelMappedEstimator::new(mapper(), RecordingEstimator::default());
        model.fit(&data, 2000).unwrap();

        let seen = &model.estimator().seen;
        assert_eq!(model.estimator().steps, 2000);
        assert_eq!(seen.len(), 3);
        for (original, mapped) in data.iter().zip(seen.iter()) {
            assert_eq!(mapped.dim(), 64);
            assert_eq!(mapped.label, original.label);
            assert_eq!(mapped.features, model.mapper().map(&original.features).unwrap());
        }
    }

    #[test]
    fn test_evaluate_returns_estimator_metrics() {
        let model = KernelMappedEstimator::new(mapper(), RecordingEstimator::default());
        let metrics = model.evaluate(&training_data()).unwrap();
        assert_eq!(metrics.get("samples"), Some(&3.0));
        assert_eq!(metrics.get("feature_dim"), Some(&64.0));
    }

    #[test]
    fn test_mapping_error_stops_before_estimator() {
        let mut data = training_data();
        data.push(DataPoint::new(vec![1.0, 2.0, 3.0], 1));
        let mut model = KernelMappedEstimator::new(mapper(), RecordingEstimator::default());

        let err = model.fit(&data, 10).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Mapping(KernelError::BatchDimensionMismatch { row: 3, expected: 2, actual: 3 })
        ));
        assert!(model.estimator().seen.is_empty());
        assert_eq!(model.estimator().steps, 0);
    }

    #[test]
    fn test_estimator_error_is_wrapped() {
        let estimator = RecordingEstimator { refuse: true, ..Default::default() };
        let mut model = KernelMappedEstimator::new(mapper(), estimator);
        let err = model.fit(&training_data(), 10).unwrap_err();
        assert!(matches!(err, PipelineError::Estimator(RefusedError("fit"))));
        assert_eq!(err.to_string(), "estimator failed: recording estimator refused: fit");
    }

    #[test]
    fn test_report_prints_sorted_metrics() {
        let mut metrics = Metrics::new();
        metrics.insert("loss".to_string(), 0.25);
        metrics.insert("accuracy".to_string(), 0.9712);
        let report = EvaluationReport::from(metrics);
        assert_eq!(report.get("accuracy"), Some(0.9712));
        assert_eq!(report.get("auc"), None);
        assert_eq!(report.to_string(), "accuracy: 0.9712\nloss: 0.2500\n");
    }
}
