use elastic_dist::{DistError, Measure};

/// Errors from classifier configuration, dataset validation, and training.
#[derive(Debug, thiserror::Error)]
pub enum NnError {
    /// Returned when a measure or classifier name cannot be parsed.
    #[error("unknown measure {name:?}")]
    UnknownMeasure {
        /// The name as given.
        name: String,
    },

    /// Returned when a classifier identifier has an unrecognised part.
    #[error("unknown classifier {name:?}: unrecognised part {part:?}")]
    UnknownClassifier {
        /// The identifier as given.
        name: String,
        /// The part that could not be parsed.
        part: String,
    },

    /// Returned when a parameter id lies outside the grid.
    #[error("parameter id {param_id} is out of range for a grid of {grid_size}")]
    InvalidParamId {
        /// The requested id.
        param_id: usize,
        /// Number of parameter tuples in the grid.
        grid_size: usize,
    },

    /// Returned when a custom grid has no parameter tuples.
    #[error("parameter grid is empty")]
    EmptyGrid,

    /// Returned when a custom grid mixes measures.
    #[error("parameter grid entry {index} is {found}, expected {expected}")]
    MixedGrid {
        /// Measure of the classifier.
        expected: Measure,
        /// Measure of the offending entry.
        found: Measure,
        /// Position of the offending entry.
        index: usize,
    },

    /// Returned by the table builders when fewer than two training instances are given.
    #[error("need at least 2 training instances for leave-one-out, got {n_train}")]
    InsufficientData {
        /// Number of training instances supplied.
        n_train: usize,
    },

    /// Returned when a sequence label is not below the declared number of classes.
    #[error("sequence {index} has label {label}, but the dataset declares {n_classes} classes")]
    LabelOutOfRange {
        /// Position of the sequence.
        index: usize,
        /// Its label.
        label: usize,
        /// Declared number of classes.
        n_classes: usize,
    },

    /// Returned when classifying or evaluating before a successful `train`.
    #[error("classifier has not been trained")]
    NotTrained,

    /// Returned when a sequence fails validation.
    #[error("invalid sequence")]
    InvalidSequence {
        /// The underlying validation error.
        source: DistError,
    },
}

impl From<DistError> for NnError {
    fn from(err: DistError) -> Self {
        match err {
            DistError::UnknownMeasure { name } => Self::UnknownMeasure { name },
            source => Self::InvalidSequence { source },
        }
    }
}
