//! Dynamic Time Warping over squared point costs.

use super::{ElasticDistance, Recurrence, Step, WarpingPathResults, classic, eap, order_by_length, pick, sq};
use crate::series::TimeSeriesView;
use crate::window::Window;

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// The distance is the minimum sum of `(a_i - b_j)^2` over warping paths inside the
/// window band. No square root is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtw {
    window: Window,
}

impl Dtw {
    /// Create a DTW calculator with the given window.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// Create an unconstrained DTW calculator.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self::new(Window::UNCONSTRAINED)
    }

    /// Return the window.
    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    fn recurrence<'a>(&self, a: &'a [f64], b: &'a [f64]) -> DtwRecurrence<'a> {
        let (rows, cols) = order_by_length(a, b);
        DtwRecurrence { rows, cols, window: self.window }
    }
}

impl Default for Dtw {
    fn default() -> Self {
        Self::unconstrained()
    }
}

impl ElasticDistance for Dtw {
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

struct DtwRecurrence<'a> {
    rows: &'a [f64],
    cols: &'a [f64],
    window: Window,
}

impl Recurrence for DtwRecurrence<'_> {
    fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    fn window(&self) -> Window {
        self.window
    }

    #[inline]
    fn step(&self, i: usize, j: usize, diag: f64, top: f64, left: f64) -> (f64, Step) {
        let cost = sq(self.rows[i - 1] - self.cols[j - 1]);
        let (best, step) = pick(diag, top, left);
        (best + cost, step)
    }

    fn last_step_lower(&self) -> f64 {
        match (self.rows.last(), self.cols.last()) {
            (Some(a), Some(b)) => sq(a - b),
            _ => 0.0,
        }
    }
}
