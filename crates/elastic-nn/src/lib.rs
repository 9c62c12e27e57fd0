//! Elastic-distance 1NN classification with leave-one-out parameter selection.
//!
//! Builds nearest-neighbour tables for whole parameter grids, either incrementally (one
//! pass, lazy pairwise assessments, backward propagation along window chains) or one
//! parameter at a time, and turns them into trained classifiers.

mod assess;
mod builder;
mod candidate;
mod classifier;
mod config;
mod confusion;
mod dataset;
mod error;
mod params;
mod result;

pub use assess::{AssessState, LazyAssessNn, Outcome};
pub use builder::{build_incremental, build_per_parameter};
pub use candidate::{CandidateNn, CandidateTable, Status, vote_winner};
pub use classifier::ElasticClassifier;
pub use config::{ClassifierConfig, GridKind, TrainingStrategy};
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use dataset::Dataset;
pub use error::NnError;
pub use params::{ParameterGrid, STANDARD_GRID_SIZE, standard_params};
pub use result::{TestResult, TrainResult};
