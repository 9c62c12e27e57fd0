//! Training and evaluation records handed to result writers.

use elastic_dist::Counters;
use serde::Serialize;

use crate::confusion::ConfusionMatrix;

/// Outcome of leave-one-out training over a parameter grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainResult {
    /// Dataset name as given by the caller.
    pub problem: String,
    /// Classifier identifier, e.g. `dtw-eap-incremental`.
    pub classifier: String,
    /// Chosen `paramId`.
    pub param_id: usize,
    /// Chosen parameters in display form.
    pub params: String,
    /// Leave-one-out accuracy of the chosen parameters.
    pub accuracy: f64,
    pub correct: usize,
    pub size: usize,
    pub elapsed_secs: f64,
    /// Leave-one-out accuracy of every searched entry, aligned with `param_ids`.
    pub param_accuracies: Vec<f64>,
    pub param_ids: Vec<usize>,
    /// Leave-one-out prediction of every training instance under the chosen parameters.
    pub predictions: Vec<Option<usize>>,
    pub counters: Counters,
}

/// Outcome of classifying a test set with a trained classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub accuracy: f64,
    pub correct: usize,
    pub size: usize,
    pub elapsed_secs: f64,
    pub confusion: ConfusionMatrix,
    pub predictions: Vec<Option<usize>>,
    pub counters: Counters,
}
