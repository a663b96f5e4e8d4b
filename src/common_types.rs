//! Data structures shared by the mappers and the estimator adapter.

use std::collections::BTreeMap;

/// A single sample: a dense feature vector and its label.
///
/// - `F`: The type of the features (e.g., `f64`, `f32`).
/// - `L`: The type of the label (e.g., `u8` for MNIST digits, `bool` for Census income).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataPoint<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

impl<F, L> DataPoint<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        DataPoint { features, label }
    }

    /// Number of features in this sample.
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Evaluation results keyed by metric name ("accuracy", "loss", ...).
/// A `BTreeMap` keeps the printing order stable.
pub type Metrics = BTreeMap<String, f64>;
