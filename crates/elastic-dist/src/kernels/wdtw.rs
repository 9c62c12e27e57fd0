//! Weighted DTW: squared costs scaled by a logistic penalty on the phase difference.

use super::{ElasticDistance, Recurrence, Step, WarpingPathResults, classic, eap, order_by_length, pick, sq};
use crate::series::TimeSeriesView;

/// Immutable WDTW configuration. Thread-safe and copyable.
///
/// Cell `(i, j)` costs `w(|i - j|) * (a_i - b_j)^2` with
/// `w(k) = 1 / (1 + exp(-g * (k - L / 2)))` and `L` the longer length. Always unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wdtw {
    g: f64,
}

impl Wdtw {
    /// Create a WDTW calculator with penalty steepness `g`.
    #[must_use]
    pub fn new(g: f64) -> Self {
        Self { g }
    }

    /// Return the penalty steepness.
    #[must_use]
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Weight `w(k)` of phase difference `k` for series whose longer length is `len`.
    #[must_use]
    pub fn weight(&self, k: usize, len: usize) -> f64 {
        1.0 / (1.0 + (-self.g * (k as f64 - len as f64 / 2.0)).exp())
    }

    /// Weight vector `w(0), ..., w(len - 1)`.
    #[must_use]
    pub fn weights(&self, len: usize) -> Vec<f64> {
        (0..len).map(|k| self.weight(k, len)).collect()
    }

    fn recurrence<'a>(&self, a: &'a [f64], b: &'a [f64]) -> WdtwRecurrence<'a> {
        let (rows, cols) = order_by_length(a, b);
        WdtwRecurrence { rows, cols, weights: self.weights(rows.len()) }
    }
}

impl ElasticDistance for Wdtw {
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> f64 {
        classic(&self.recurrence(a.as_slice(), b.as_slice())).distance
    }

    fn distance_extended(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        cutoff: f64,
    ) -> WarpingPathResults {
        let result = eap(&self.recurrence(a.as_slice(), b.as_slice()), cutoff);
        WarpingPathResults { min_window_validity: 0, ..result }
    }
}

struct WdtwRecurrence<'a> {
    rows: &'a [f64],
    cols: &'a [f64],
    weights: Vec<f64>,
}

impl Recurrence for WdtwRecurrence<'_> {
    fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    #[inline]
    fn step(&self, i: usize, j: usize, diag: f64, top: f64, left: f64) -> (f64, Step) {
        let cost = self.weights[i.abs_diff(j)] * sq(self.rows[i - 1] - self.cols[j - 1]);
        let (best, step) = pick(diag, top, left);
        (best + cost, step)
    }

    fn last_step_lower(&self) -> f64 {
        let (n, m) = self.shape();
        match (self.rows.last(), self.cols.last()) {
            (Some(a), Some(b)) => self.weights[n.abs_diff(m)] * sq(a - b),
            _ => 0.0,
        }
    }
}
