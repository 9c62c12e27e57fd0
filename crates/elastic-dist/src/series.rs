//! Sequence types with validation guarantees.

use std::ops::Index;

use crate::error::DistError;

/// Owned, validated sequence of values. Guaranteed non-empty with all finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries(Vec<f64>);

impl TimeSeries {
    /// Create a new series, validating that it is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DistError::EmptySeries`] | `values` is empty |
    /// | [`DistError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, DistError> {
        if values.is_empty() {
            return Err(DistError::EmptySeries);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(DistError::NonFiniteValue { index });
        }
        Ok(Self(values))
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> TimeSeriesView<'_> {
        TimeSeriesView(&self.0)
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed series; provided for `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[f64]> for TimeSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for TimeSeries {
    type Error = DistError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Borrowed, validated view into a series. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesView<'a>(&'a [f64]);

impl<'a> TimeSeriesView<'a> {
    /// Create a new view, validating that the slice is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DistError::EmptySeries`] | `slice` is empty |
    /// | [`DistError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, DistError> {
        if slice.is_empty() {
            return Err(DistError::EmptySeries);
        }
        if let Some(index) = slice.iter().position(|v| !v.is_finite()) {
            return Err(DistError::NonFiniteValue { index });
        }
        Ok(Self(slice))
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed view; provided for `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for TimeSeriesView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for TimeSeriesView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}

/// A labelled sequence: the unit of training and test data.
///
/// Immutable once built. Labels are dense class indices `0..n_classes`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    series: TimeSeries,
    label: usize,
}

impl Sequence {
    /// Create a labelled sequence from raw values.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TimeSeries::new`].
    pub fn new(values: Vec<f64>, label: usize) -> Result<Self, DistError> {
        Ok(Self {
            series: TimeSeries::new(values)?,
            label,
        })
    }

    /// Attach a label to an already validated series.
    #[must_use]
    pub fn from_series(series: TimeSeries, label: usize) -> Self {
        Self { series, label }
    }

    /// Return the class label.
    #[must_use]
    pub fn label(&self) -> usize {
        self.label
    }

    /// Return the values as a slice.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        self.series.as_ref()
    }

    /// Borrow the values as a view.
    #[must_use]
    pub fn as_view(&self) -> TimeSeriesView<'_> {
        self.series.as_view()
    }

    /// Borrow the underlying series.
    #[must_use]
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Always `false`; provided for `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_vec() {
        let result = TimeSeries::new(vec![]);
        assert!(matches!(result, Err(DistError::EmptySeries)));
    }

    #[test]
    fn rejects_nan() {
        let result = TimeSeries::new(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(result, Err(DistError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn rejects_neg_infinity() {
        let result = TimeSeries::new(vec![f64::NEG_INFINITY, 2.0]);
        assert!(matches!(result, Err(DistError::NonFiniteValue { index: 0 })));
    }

    #[test]
    fn view_indexing() {
        let data = [10.0, 20.0, 30.0];
        let view = TimeSeriesView::new(&data).unwrap();
        assert_eq!(view[0], 10.0);
        assert_eq!(view[2], 30.0);
    }

    #[test]
    fn sequence_keeps_label_and_values() {
        let s = Sequence::new(vec![1.0, 2.0, 3.0], 4).unwrap();
        assert_eq!(s.label(), 4);
        assert_eq!(s.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn sequence_rejects_infinite_value() {
        let result = Sequence::new(vec![1.0, f64::INFINITY], 0);
        assert!(matches!(result, Err(DistError::NonFiniteValue { index: 1 })));
    }
}
