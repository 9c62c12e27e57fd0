//! Edit distance with Real Penalty.

use super::{ElasticDistance, Recurrence, Step, WarpingPathResults, classic, eap, order_by_length, pick, sq};
use crate::series::TimeSeriesView;
use crate::window::Window;

/// Immutable ERP configuration. Thread-safe and copyable.
///
/// Matching `a_i` with `b_j` costs `(a_i - b_j)^2`; skipping a point `x` costs `(x - g)^2`.
/// Gap cells on row 0 and column 0 exist only inside the window band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Erp {
    window: Window,
    g: f64,
}

impl Erp {
    /// Create an ERP calculator with the given window and gap value.
    #[must_use]
    pub fn new(window: Window, g: f64) -> Self {
        Self { window, g }
    }

    /// Return the window.
    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Return the gap value.
    #[must_use]
    pub fn g(&self) -> f64 {
        self.g
    }

    fn recurrence<'a>(&self, a: &'a [f64], b: &'a [f64]) -> ErpRecurrence<'a> {
        let (rows, cols) = order_by_length(a, b);
        ErpRecurrence { rows, cols, window: self.window, g: self.g }
    }
}

impl ElasticDistance for Erp {
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> f64 {
        classic(&self.recurrence(a.as_slice(), b.as_slice())).distance
    }

    fn distance_extended(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        cutoff: f64,
    ) -> WarpingPathResults {
        eap(&self.recurrence(a.as_slice(), b.as_slice()), cutoff)
    }
}

struct ErpRecurrence<'a> {
    rows: &'a [f64],
    cols: &'a [f64],
    window: Window,
    g: f64,
}

impl Recurrence for ErpRecurrence<'_> {
    fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    fn window(&self) -> Window {
        self.window
    }

    fn has_borders(&self) -> bool {
        true
    }

    fn border_row(&self, i: usize) -> f64 {
        sq(self.rows[i - 1] - self.g)
    }

    fn border_col(&self, j: usize) -> f64 {
        sq(self.cols[j - 1] - self.g)
    }

    #[inline]
    fn step(&self, i: usize, j: usize, diag: f64, top: f64, left: f64) -> (f64, Step) {
        let a = self.rows[i - 1];
        let b = self.cols[j - 1];
        pick(diag + sq(a - b), top + sq(a - self.g), left + sq(b - self.g))
    }

    fn last_step_lower(&self) -> f64 {
        match (self.rows.last(), self.cols.last()) {
            (Some(&a), Some(&b)) => sq(a - b).min(sq(a - self.g)).min(sq(b - self.g)),
            _ => 0.0,
        }
    }
}
