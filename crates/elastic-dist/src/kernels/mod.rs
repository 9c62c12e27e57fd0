//! Elastic distance kernels.
//!
//! Every measure is a small immutable configuration struct implementing
//! [`ElasticDistance`]: a classic rolling-buffer dynamic program, an early
//! abandoning and pruning (EAP) variant driven by a cutoff, and an extended
//! variant that also reports the narrowest window containing the selected
//! alignment.
//!
//! The cost-minimising measures (DTW, WDTW, ERP, MSM, TWE) share one classic
//! engine and one EAP engine over a [`Recurrence`]; LCSS maximises matches and
//! has its own loops.

mod dtw;
mod erp;
mod lcss;
mod msm;
mod twe;
mod wdtw;

pub use dtw::Dtw;
pub use erp::Erp;
pub use lcss::Lcss;
pub use msm::Msm;
pub use twe::Twe;
pub use wdtw::Wdtw;

use crate::series::TimeSeriesView;
use crate::window::Window;

const INF: f64 = f64::INFINITY;

/// Relative slack added to the EAP upper bound so float reassociation never prunes a cell
/// lying on a path whose total is exactly the cutoff.
const UB_RELATIVE_SLACK: f64 = 1e-9;

/// A distance together with the narrowest window for which it stays exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpingPathResults {
    /// The computed distance, `+inf` when abandoned.
    pub distance: f64,
    /// Largest `|i - j|` on the selected alignment; any window at least this wide
    /// (and no wider than the one used) yields the same distance.
    pub min_window_validity: usize,
}

impl WarpingPathResults {
    /// Result of an abandoned computation.
    pub const ABANDONED: Self = Self {
        distance: INF,
        min_window_validity: 0,
    };

    /// Return true if the computation was abandoned.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.distance == INF
    }
}

/// Capability shared by all elastic measures.
pub trait ElasticDistance {
    /// Full computation with no cutoff.
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> f64;

    /// EAP computation: returns the exact distance when it is `<= cutoff`, `+inf` otherwise.
    fn distance_with_cutoff(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>, cutoff: f64) -> f64 {
        self.distance_extended(a, b, cutoff).distance
    }

    /// EAP computation that also reports the window validity of the result.
    fn distance_extended(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        cutoff: f64,
    ) -> WarpingPathResults;
}

/// Which predecessor a cell took its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Diag,
    Top,
    Left,
}

/// Pick the smallest candidate, preferring diagonal, then top, then left on exact ties.
#[inline]
pub(crate) fn pick(diag: f64, top: f64, left: f64) -> (f64, Step) {
    if diag <= top && diag <= left {
        (diag, Step::Diag)
    } else if top <= left {
        (top, Step::Top)
    } else {
        (left, Step::Left)
    }
}

#[inline]
pub(crate) fn sq(x: f64) -> f64 {
    x * x
}

/// Put the longer sequence on the rows so the rolling buffers span the shorter one.
#[inline]
pub(crate) fn order_by_length<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    if a.len() >= b.len() { (a, b) } else { (b, a) }
}

/// A cost-minimising recurrence over a 1-based `(rows + 1) x (cols + 1)` matrix.
///
/// Cell `(0, 0)` is `0`. Without borders the rest of row 0 and column 0 is unreachable.
pub(crate) trait Recurrence {
    /// Number of rows and columns (sequence lengths).
    fn shape(&self) -> (usize, usize);

    fn window(&self) -> Window {
        Window::UNCONSTRAINED
    }

    /// Whether row 0 and column 0 hold reachable gap cells.
    fn has_borders(&self) -> bool {
        false
    }

    /// Cost of reaching `(i, 0)` from `(i - 1, 0)`.
    fn border_row(&self, _i: usize) -> f64 {
        INF
    }

    /// Cost of reaching `(0, j)` from `(0, j - 1)`.
    fn border_col(&self, _j: usize) -> f64 {
        INF
    }

    /// Value of cell `(i, j)` (both `>= 1`) from its three predecessor values.
    ///
    /// Predecessors may be `+inf`; implementations must not index outside the
    /// sequences for an unreachable predecessor.
    fn step(&self, i: usize, j: usize, diag: f64, top: f64, left: f64) -> (f64, Step);

    /// A lower bound on the cost of the final step into `(rows, cols)`.
    fn last_step_lower(&self) -> f64;
}

/// Classic dynamic program with two rolling rows.
pub(crate) fn classic<R: Recurrence>(rec: &R) -> WarpingPathResults {
    let (n, m) = rec.shape();
    let window = rec.window();
    let borders = rec.has_borders();

    let mut prev = vec![INF; m + 1];
    let mut curr = vec![INF; m + 1];
    let mut prev_dev = vec![0usize; m + 1];
    let mut curr_dev = vec![0usize; m + 1];

    prev[0] = 0.0;
    if borders {
        for j in window.column_range(0, m).skip(1) {
            prev[j] = prev[j - 1] + rec.border_col(j);
            prev_dev[j] = j;
        }
    }

    for i in 1..=n {
        curr.fill(INF);
        for j in window.column_range(i, m) {
            if j == 0 {
                if borders {
                    curr[0] = prev[0] + rec.border_row(i);
                    curr_dev[0] = i;
                }
                continue;
            }
            let (value, step) = rec.step(i, j, prev[j - 1], prev[j], curr[j - 1]);
            curr[j] = value;
            curr_dev[j] = i.abs_diff(j).max(match step {
                Step::Diag => prev_dev[j - 1],
                Step::Top => prev_dev[j],
                Step::Left => curr_dev[j - 1],
            });
        }
        std::mem::swap(&mut prev, &mut curr);
        std::mem::swap(&mut prev_dev, &mut curr_dev);
    }

    if prev[m] == INF {
        return WarpingPathResults::ABANDONED;
    }
    WarpingPathResults {
        distance: prev[m],
        min_window_validity: prev_dev[m],
    }
}

/// Upper bound on the accumulated cost of any non-final cell that can still lead to a
/// final value `<= cutoff`.
pub(crate) fn upper_bound(cutoff: f64, last_step_lower: f64) -> f64 {
    if cutoff == INF {
        return INF;
    }
    let slack = UB_RELATIVE_SLACK * cutoff.abs().max(1.0);
    cutoff - last_step_lower + slack
}

/// Early abandoning and pruning dynamic program.
///
/// Cells above `ub` are dead and stored as `+inf`. Each row starts at the first live
/// column of the previous row (the next start) and stops once no live predecessor
/// remains past the previous row's last live column (the pruning point). A row with no
/// live cell abandons; the final cell is accepted only if `<= cutoff`.
pub(crate) fn eap<R: Recurrence>(rec: &R, cutoff: f64) -> WarpingPathResults {
    let (n, m) = rec.shape();
    let window = rec.window();
    if !window.contains(n, m) {
        return WarpingPathResults::ABANDONED;
    }
    let borders = rec.has_borders();
    let ub = upper_bound(cutoff, rec.last_step_lower());

    let mut prev = vec![INF; m + 1];
    let mut curr = vec![INF; m + 1];
    let mut prev_dev = vec![0usize; m + 1];
    let mut curr_dev = vec![0usize; m + 1];

    prev[0] = 0.0;
    let mut prev_lo = 0usize;
    let mut prev_hi = 0usize;
    if borders {
        for j in window.column_range(0, m).skip(1) {
            let value = prev[j - 1] + rec.border_col(j);
            if value > ub {
                break;
            }
            prev[j] = value;
            prev_dev[j] = j;
            prev_hi = j;
        }
    }

    let first_col = usize::from(!borders);
    for i in 1..=n {
        let band = window.column_range(i, m);
        let start = (*band.start()).max(prev_lo).max(first_col);
        let end = *band.end();

        let mut row_lo: Option<usize> = None;
        let mut row_hi = 0usize;
        let mut left = INF;
        let mut left_dev = 0usize;

        for j in start..=end {
            let live = |k: usize| k >= prev_lo && k <= prev_hi;
            let top = if live(j) { prev[j] } else { INF };
            let diag = if j >= 1 && live(j - 1) { prev[j - 1] } else { INF };

            if top == INF && diag == INF && left == INF {
                if j > prev_hi {
                    break;
                }
                curr[j] = INF;
                continue;
            }

            let (value, dev) = if j == 0 {
                (top + rec.border_row(i), i.max(prev_dev[0]))
            } else {
                let (value, step) = rec.step(i, j, diag, top, left);
                let from = match step {
                    Step::Diag => prev_dev[j - 1],
                    Step::Top => prev_dev[j],
                    Step::Left => left_dev,
                };
                (value, i.abs_diff(j).max(from))
            };

            let alive = if i == n && j == m { value <= cutoff } else { value <= ub };
            if alive {
                curr[j] = value;
                curr_dev[j] = dev;
                row_lo.get_or_insert(j);
                row_hi = j;
                left = value;
                left_dev = dev;
            } else {
                curr[j] = INF;
                left = INF;
            }
        }

        let Some(lo) = row_lo else {
            return WarpingPathResults::ABANDONED;
        };
        prev_lo = lo;
        prev_hi = row_hi;
        std::mem::swap(&mut prev, &mut curr);
        std::mem::swap(&mut prev_dev, &mut curr_dev);
    }

    if prev_hi != m || prev[m] == INF {
        return WarpingPathResults::ABANDONED;
    }
    WarpingPathResults {
        distance: prev[m],
        min_window_validity: prev_dev[m],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_prefers_diagonal_then_top() {
        assert_eq!(pick(1.0, 1.0, 1.0), (1.0, Step::Diag));
        assert_eq!(pick(2.0, 1.0, 1.0), (1.0, Step::Top));
        assert_eq!(pick(2.0, 3.0, 1.0), (1.0, Step::Left));
        assert_eq!(pick(INF, INF, INF).1, Step::Diag);
    }

    #[test]
    fn upper_bound_infinite_cutoff() {
        assert_eq!(upper_bound(INF, 3.0), INF);
    }

    #[test]
    fn upper_bound_subtracts_last_step_with_slack() {
        let ub = upper_bound(10.0, 4.0);
        assert!(ub >= 6.0 && ub < 6.0 + 1e-6);
    }

    #[test]
    fn order_by_length_puts_longer_first() {
        let a = [1.0];
        let b = [1.0, 2.0];
        let (x, y) = order_by_length(&a, &b);
        assert_eq!(x.len(), 2);
        assert_eq!(y.len(), 1);
    }
}
