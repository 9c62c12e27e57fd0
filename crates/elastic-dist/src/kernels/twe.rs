//! Time Warp Edit distance.

use super::{ElasticDistance, Recurrence, Step, WarpingPathResults, classic, eap, order_by_length, pick, sq};
use crate::series::TimeSeriesView;

/// Immutable TWE configuration. Thread-safe and copyable.
///
/// Timestamps are the indices. Both series are read as if prefixed with a `0` sample, so
/// the first deletion or match compares against `0`. Always unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twe {
    nu: f64,
    lambda: f64,
}

impl Twe {
    /// Create a TWE calculator with stiffness `nu` and deletion penalty `lambda`.
    #[must_use]
    pub fn new(nu: f64, lambda: f64) -> Self {
        Self { nu, lambda }
    }

    /// Return the stiffness.
    #[must_use]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Return the deletion penalty.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    fn recurrence<'a>(&self, a: &'a [f64], b: &'a [f64]) -> TweRecurrence<'a> {
        let (rows, cols) = order_by_length(a, b);
        TweRecurrence { rows, cols, nu: self.nu, delete: self.nu + self.lambda }
    }
}

impl ElasticDistance for Twe {
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

struct TweRecurrence<'a> {
    rows: &'a [f64],
    cols: &'a [f64],
    nu: f64,
    /// `nu + lambda`: the fixed part of every deletion.
    delete: f64,
}

/// Sample `k` (1-based) of a zero-padded series.
#[inline]
fn padded(values: &[f64], k: usize) -> f64 {
    if k == 0 { 0.0 } else { values[k - 1] }
}

impl TweRecurrence<'_> {
    #[inline]
    fn match_cost(&self, i: usize, j: usize) -> f64 {
        sq(padded(self.rows, i) - padded(self.cols, j))
            + sq(padded(self.rows, i - 1) - padded(self.cols, j - 1))
            + self.nu * (2 * i.abs_diff(j)) as f64
    }

    #[inline]
    fn delete_row(&self, i: usize) -> f64 {
        sq(padded(self.rows, i) - padded(self.rows, i - 1)) + self.delete
    }

    #[inline]
    fn delete_col(&self, j: usize) -> f64 {
        sq(padded(self.cols, j) - padded(self.cols, j - 1)) + self.delete
    }
}

impl Recurrence for TweRecurrence<'_> {
    fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    #[inline]
    fn step(&self, i: usize, j: usize, diag: f64, top: f64, left: f64) -> (f64, Step) {
        pick(
            diag + self.match_cost(i, j),
            top + self.delete_row(i),
            left + self.delete_col(j),
        )
    }

    fn last_step_lower(&self) -> f64 {
        let (n, m) = self.shape();
        if n == 0 || m == 0 {
            return 0.0;
        }
        self.match_cost(n, m).min(self.delete_row(n)).min(self.delete_col(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(data: &[f64]) -> TimeSeriesView<'_> {
        TimeSeriesView::new(data).unwrap()
    }

    fn naive(a: &[f64], b: &[f64], nu: f64, lambda: f64) -> f64 {
        let (n, m) = (a.len(), b.len());
        let pa: Vec<f64> = std::iter::once(0.0).chain(a.iter().copied()).collect();
        let pb: Vec<f64> = std::iter::once(0.0).chain(b.iter().copied()).collect();
        let mut d = vec![vec![f64::INFINITY; m + 1]; n + 1];
        d[0][0] = 0.0;
        for i in 1..=n {
            for j in 1..=m {
                let del_a = d[i - 1][j] + (pa[i] - pa[i - 1]).powi(2) + nu + lambda;
                let del_b = d[i][j - 1] + (pb[j] - pb[j - 1]).powi(2) + nu + lambda;
                let mat = d[i - 1][j - 1]
                    + (pa[i] - pb[j]).powi(2)
                    + (pa[i - 1] - pb[j - 1]).powi(2)
                    + nu * (2 * i.abs_diff(j)) as f64;
                d[i][j] = mat.min(del_a).min(del_b);
            }
        }
        d[n][m]
    }

    #[test]
    fn identical_is_zero() {
        let a = [0.5, 1.5, -0.5];
        assert_eq!(Twe::new(0.001, 0.1).distance(view(&a), view(&a)), 0.0);
    }

    #[test]
    fn matches_naive() {
        let a = [0.3, -1.2, 2.5, 0.0, 1.1, -0.7, 0.4];
        let b = [1.0, 0.2, -0.5, 2.2, 0.9];
        for (nu, lambda) in [(1e-5, 0.0), (0.01, 0.05), (1.0, 0.1)] {
            let got = Twe::new(nu, lambda).distance(view(&a), view(&b));
            let want = naive(&a, &b, nu, lambda);
            assert!((got - want).abs() < 1e-12, "nu={nu} lambda={lambda}: {got} vs {want}");
        }
    }

    #[test]
    fn eap_agrees_and_abandons() {
        let a = [0.3, -1.2, 2.5, 0.0, 1.1, -0.7, 0.4];
        let b = [1.0, 0.2, -0.5, 2.2, 0.9];
        let twe = Twe::new(0.05, 0.1);
        let d = twe.distance(view(&a), view(&b));
        assert_eq!(twe.distance_with_cutoff(view(&a), view(&b), d), d);
        assert!(twe.distance_with_cutoff(view(&a), view(&b), d * 0.7).is_infinite());
    }
}
