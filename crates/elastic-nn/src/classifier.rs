//! Elastic-distance 1NN classifier: leave-one-out training and test evaluation.

use std::time::Instant;

use elastic_dist::{
    Counters, ElasticDistance, Params, Sequence, SeriesStats, corner_bound, deflate,
};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::builder::{build_incremental, build_per_parameter};
use crate::candidate::{CandidateTable, vote_winner};
use crate::config::{ClassifierConfig, GridKind, TrainingStrategy};
use crate::confusion::ConfusionMatrix;
use crate::dataset::Dataset;
use crate::error::NnError;
use crate::params::ParameterGrid;
use crate::result::{TestResult, TrainResult};

/// State kept after training: the reference set and the chosen parameters.
#[derive(Debug, Clone)]
struct Trained {
    reference: Dataset,
    stats: Vec<SeriesStats>,
    params: Params,
    param_id: usize,
}

/// A 1NN classifier over one elastic measure.
///
/// Create via [`ClassifierConfig::build`], then [`train`](Self::train) before classifying.
#[derive(Debug, Clone)]
pub struct ElasticClassifier {
    config: ClassifierConfig,
    trained: Option<Trained>,
}

impl ElasticClassifier {
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config, trained: None }
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Chosen parameters, once trained.
    #[must_use]
    pub fn params(&self) -> Option<&Params> {
        self.trained.as_ref().map(|t| &t.params)
    }

    /// Chosen `paramId`, once trained.
    #[must_use]
    pub fn param_id(&self) -> Option<usize> {
        self.trained.as_ref().map(|t| t.param_id)
    }

    fn grid(&self, train: &Dataset) -> Result<ParameterGrid, NnError> {
        let measure = self.config.measure;
        let grid = match &self.config.grid {
            GridKind::Standard => ParameterGrid::standard(measure, train),
            GridKind::Custom(params) => ParameterGrid::custom(measure, params.clone())?,
        };
        match self.config.param_id {
            Some(id) => grid.restrict(id),
            None => Ok(grid),
        }
    }

    /// Select parameters by leave-one-out cross-validation on `train`.
    ///
    /// Every grid entry is scored by the number of training instances whose leave-one-out
    /// prediction matches their label; the first entry with the highest score wins. A
    /// training set too small for leave-one-out is not an error: it is logged and the
    /// first entry is chosen with zero accuracy.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::InvalidParamId`] | The configured `param_id` is not in the grid |
    /// | [`NnError::EmptyGrid`] / [`NnError::MixedGrid`] | The custom grid is invalid |
    #[instrument(skip_all, fields(problem = %problem, classifier = %self.config, n = train.len()))]
    pub fn train(&mut self, problem: &str, train: &Dataset) -> Result<TrainResult, NnError> {
        let start = Instant::now();
        let grid = self.grid(train)?;
        let mut counters = Counters::new();
        let n = train.len();

        let built = match self.config.strategy {
            TrainingStrategy::Incremental => build_incremental(train, &grid, self.config.eap, &mut counters),
            TrainingStrategy::PerParameter => build_per_parameter(train, &grid, self.config.eap, &mut counters),
        };
        let (corrects, predictions, best) = match built {
            Ok(table) => summarise(&table),
            Err(NnError::InsufficientData { n_train }) => {
                warn!(n_train, "too few training instances for leave-one-out, choosing first parameter");
                (vec![0; grid.len()], vec![None; n], 0)
            }
            Err(e) => return Err(e),
        };

        let accuracy_of = |correct: usize| if n == 0 { 0.0 } else { correct as f64 / n as f64 };
        let param_accuracies: Vec<f64> = corrects.iter().map(|&c| accuracy_of(c)).collect();
        let params = *grid.get(best);
        let param_id = grid.ids()[best];
        let elapsed_secs = start.elapsed().as_secs_f64();

        debug!(?param_accuracies, ?counters, "leave-one-out scores");
        info!(
            param_id,
            params = %params,
            accuracy = param_accuracies[best],
            elapsed_secs,
            "training complete"
        );

        self.trained = Some(Trained {
            stats: train.sequences().iter().map(|s| SeriesStats::compute(s.values())).collect(),
            reference: train.clone(),
            params,
            param_id,
        });

        Ok(TrainResult {
            problem: problem.to_owned(),
            classifier: self.config.name(),
            param_id,
            params: params.to_string(),
            accuracy: param_accuracies[best],
            correct: corrects[best],
            size: n,
            elapsed_secs,
            param_accuracies,
            param_ids: grid.ids().to_vec(),
            predictions,
            counters,
        })
    }

    /// Predict the class of `query` from its nearest training neighbours.
    ///
    /// All neighbours tied at the smallest distance vote; equal vote counts go to the class
    /// seen first in training order. Returns `None` when no training instance is at a finite
    /// distance.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::NotTrained`] | [`train`](Self::train) has not succeeded yet |
    pub fn classify(&self, query: &Sequence, counters: &mut Counters) -> Result<Option<usize>, NnError> {
        let trained = self.trained.as_ref().ok_or(NnError::NotTrained)?;
        let reference = &trained.reference;
        let params = &trained.params;
        let q = query.values();
        let q_stats = SeriesStats::compute(q);

        let n_classes = reference.n_classes();
        let mut votes = vec![0u32; n_classes];
        let mut earliest = vec![usize::MAX; n_classes];
        let mut best = f64::INFINITY;

        for (j, candidate) in reference.sequences().iter().enumerate() {
            let (d, cutoff) = if self.config.eap {
                counters.lower_bound_calls += 1;
                let lb = corner_bound(params, q, &q_stats, candidate.values(), &trained.stats[j]);
                if deflate(lb) > best {
                    counters.lower_bound_prunes += 1;
                    continue;
                }
                (params.distance_with_cutoff(query.as_view(), candidate.as_view(), best), best)
            } else {
                (params.distance(query.as_view(), candidate.as_view()), f64::INFINITY)
            };
            counters.record_distance(d, cutoff);

            if !d.is_finite() || d > best {
                continue;
            }
            if d < best {
                best = d;
                votes.fill(0);
                earliest.fill(usize::MAX);
            }
            let class = candidate.label();
            votes[class] += 1;
            earliest[class] = earliest[class].min(j);
        }
        Ok(vote_winner(&votes, &earliest))
    }

    /// Classify every sequence of `test` in parallel and tally the results.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::NotTrained`] | [`train`](Self::train) has not succeeded yet |
    #[instrument(skip_all, fields(classifier = %self.config, n = test.len()))]
    pub fn evaluate(&self, test: &Dataset) -> Result<TestResult, NnError> {
        let start = Instant::now();
        let trained = self.trained.as_ref().ok_or(NnError::NotTrained)?;

        let outcomes: Vec<(Option<usize>, Counters)> = test
            .sequences()
            .par_iter()
            .map(|s| {
                let mut counters = Counters::new();
                self.classify(s, &mut counters).map(|p| (p, counters))
            })
            .collect::<Result<_, _>>()?;

        let mut counters = Counters::new();
        let mut predictions = Vec::with_capacity(outcomes.len());
        for (p, c) in outcomes {
            predictions.push(p);
            counters += c;
        }

        let n_classes = test.n_classes().max(trained.reference.n_classes());
        let confusion = ConfusionMatrix::from_predictions(&test.labels(), &predictions, n_classes);
        let elapsed_secs = start.elapsed().as_secs_f64();
        info!(accuracy = confusion.accuracy(), elapsed_secs, "evaluation complete");

        Ok(TestResult {
            accuracy: confusion.accuracy(),
            correct: confusion.correct(),
            size: test.len(),
            elapsed_secs,
            confusion,
            predictions,
            counters,
        })
    }
}

/// Correct counts per grid position, predictions of the winner, and the winner's position.
fn summarise(table: &CandidateTable) -> (Vec<usize>, Vec<Option<usize>>, usize) {
    let corrects: Vec<usize> = (0..table.n_params()).map(|p| table.correct(p)).collect();
    let mut best = 0;
    for (p, &c) in corrects.iter().enumerate() {
        if c > corrects[best] {
            best = p;
        }
    }
    let predictions = (0..table.n_instances()).map(|i| table.predict(best, i)).collect();
    (corrects, predictions, best)
}
