//! Move-Split-Merge distance.

use super::{ElasticDistance, Recurrence, Step, WarpingPathResults, classic, eap, order_by_length, pick};
use crate::series::TimeSeriesView;

/// Immutable MSM configuration. Thread-safe and copyable.
///
/// Moves cost `|a_i - b_j|`; a split or merge of `x` next to neighbours `y`, `z` costs `c`
/// when `x` lies between them and `c + min(|x - y|, |x - z|)` otherwise. Always unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Msm {
    cost: f64,
}

impl Msm {
    /// Create an MSM calculator with split/merge cost `c`.
    #[must_use]
    pub fn new(cost: f64) -> Self {
        Self { cost }
    }

    /// Return the split/merge cost.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Cost of splitting or merging `x` between `y` and `z`.
    #[must_use]
    pub fn split_merge(&self, x: f64, y: f64, z: f64) -> f64 {
        if (y <= x && x <= z) || (y >= x && x >= z) {
            self.cost
        } else {
            self.cost + (x - y).abs().min((x - z).abs())
        }
    }

    fn recurrence<'a>(&self, a: &'a [f64], b: &'a [f64]) -> MsmRecurrence<'a> {
        let (rows, cols) = order_by_length(a, b);
        MsmRecurrence { rows, cols, msm: *self }
    }
}

impl ElasticDistance for Msm {
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

struct MsmRecurrence<'a> {
    rows: &'a [f64],
    cols: &'a [f64],
    msm: Msm,
}

impl MsmRecurrence<'_> {
    fn top_cost(&self, i: usize, j: usize) -> f64 {
        if i < 2 {
            return f64::INFINITY;
        }
        self.msm.split_merge(self.rows[i - 1], self.rows[i - 2], self.cols[j - 1])
    }

    fn left_cost(&self, i: usize, j: usize) -> f64 {
        if j < 2 {
            return f64::INFINITY;
        }
        self.msm.split_merge(self.cols[j - 1], self.rows[i - 1], self.cols[j - 2])
    }
}

impl Recurrence for MsmRecurrence<'_> {
    fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    #[inline]
    fn step(&self, i: usize, j: usize, diag: f64, top: f64, left: f64) -> (f64, Step) {
        let d = diag + (self.rows[i - 1] - self.cols[j - 1]).abs();
        let t = if top < f64::INFINITY { top + self.top_cost(i, j) } else { f64::INFINITY };
        let l = if left < f64::INFINITY { left + self.left_cost(i, j) } else { f64::INFINITY };
        pick(d, t, l)
    }

    fn last_step_lower(&self) -> f64 {
        let (n, m) = self.shape();
        if n == 0 || m == 0 {
            return 0.0;
        }
        (self.rows[n - 1] - self.cols[m - 1])
            .abs()
            .min(self.top_cost(n, m))
            .min(self.left_cost(n, m))
    }
}
