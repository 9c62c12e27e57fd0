//! Sequence preprocessing: z-normalisation and summary statistics.

use crate::error::PreprocessError;
use crate::series::{Sequence, TimeSeries};

/// Mean and population standard deviation (divides by `n`) of `values`.
///
/// Returns `(0.0, 0.0)` for an empty slice.
#[must_use]
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Z-normalise a series to zero mean and unit variance.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`PreprocessError::ConstantSeries`] | All values are identical (zero variance) |
#[must_use = "returns a new normalized series; the original is unchanged"]
pub fn z_normalize(series: &TimeSeries) -> Result<TimeSeries, PreprocessError> {
    let data = series.as_ref();
    let (mean, std) = mean_std(data);

    if std == 0.0 {
        return Err(PreprocessError::ConstantSeries {
            n: data.len(),
            value: data[0],
        });
    }

    let normalized: Vec<f64> = data.iter().map(|&x| (x - mean) / std).collect();
    TimeSeries::new(normalized).map_err(|_| PreprocessError::ConstantSeries {
        n: data.len(),
        value: data[0],
    })
}

/// Z-normalise the values of a labelled sequence, keeping its label.
///
/// # Errors
///
/// Same as [`z_normalize`].
pub fn z_normalize_sequence(sequence: &Sequence) -> Result<Sequence, PreprocessError> {
    let normalized = z_normalize(sequence.series())?;
    Ok(Sequence::from_series(normalized, sequence.label()))
}
