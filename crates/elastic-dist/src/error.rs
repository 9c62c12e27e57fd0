//! Error types for sequence validation and preprocessing.

/// Errors from sequence construction and validation.
#[derive(Debug, thiserror::Error)]
pub enum DistError {
    /// Returned when an empty slice is provided as a sequence.
    #[error("sequence must be non-empty")]
    EmptySeries,

    /// Returned when a sequence contains NaN, infinity, or negative infinity.
    #[error("sequence contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when parsing a measure name that is not one of the six measures.
    #[error("unknown measure {name:?} (expected dtw, wdtw, erp, lcss, msm or twe)")]
    UnknownMeasure {
        /// The name as given.
        name: String,
    },
}

/// Errors from sequence preprocessing.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// Returned when z-normalising a sequence whose values are all identical.
    #[error("cannot z-normalise a constant sequence of length {n} (value {value})")]
    ConstantSeries {
        /// Length of the offending sequence.
        n: usize,
        /// The repeated value.
        value: f64,
    },
}
