//! Longest Common SubSequence distance.

use super::{ElasticDistance, WarpingPathResults, order_by_length};
use crate::series::TimeSeriesView;
use crate::window::Window;

/// Immutable LCSS configuration. Thread-safe and copyable.
///
/// Points `a_i` and `b_j` match iff `|i - j| <= window` and `|a_i - b_j| <= epsilon`.
/// The distance is `1 - LCS / min(n, m)`, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lcss {
    window: Window,
    epsilon: f64,
}

impl Lcss {
    /// Create an LCSS calculator with the given window and matching threshold.
    #[must_use]
    pub fn new(window: Window, epsilon: f64) -> Self {
        Self { window, epsilon }
    }

    /// Return the window.
    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Return the matching threshold.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Banded LCS table with row-level abandoning.
    ///
    /// A row is abandoned once no cell `(i, j)` can still reach `LCS(i, j) + min(n - i, m - j)`
    /// matches giving a distance `<= cutoff`. Cells outside the band hold `0`, so a
    /// non-matching cell also considers its diagonal predecessor.
    fn table(&self, a: &[f64], b: &[f64], cutoff: f64) -> WarpingPathResults {
        let (rows, cols) = order_by_length(a, b);
        let (n, m) = (rows.len(), cols.len());

        if !self.window.contains(n, m) {
            return if 1.0 <= cutoff {
                WarpingPathResults { distance: 1.0, min_window_validity: 0 }
            } else {
                WarpingPathResults::ABANDONED
            };
        }

        let mut prev = vec![0usize; m + 1];
        let mut curr = vec![0usize; m + 1];
        let mut prev_dev = vec![0usize; m + 1];
        let mut curr_dev = vec![0usize; m + 1];

        for i in 1..=n {
            curr.fill(0);
            curr_dev.fill(0);
            let mut reach = 0usize;
            for j in self.window.column_range(i, m) {
                if j == 0 {
                    reach = reach.max((n - i).min(m));
                    continue;
                }
                if (rows[i - 1] - cols[j - 1]).abs() <= self.epsilon {
                    curr[j] = prev[j - 1] + 1;
                    curr_dev[j] = prev_dev[j - 1].max(i.abs_diff(j));
                } else if prev[j - 1] >= prev[j] && prev[j - 1] >= curr[j - 1] {
                    // An out-of-band neighbour holds the same count as the diagonal.
                    curr[j] = prev[j - 1];
                    curr_dev[j] = prev_dev[j - 1];
                } else if prev[j] >= curr[j - 1] {
                    curr[j] = prev[j];
                    curr_dev[j] = prev_dev[j];
                } else {
                    curr[j] = curr[j - 1];
                    curr_dev[j] = curr_dev[j - 1];
                }
                reach = reach.max(curr[j] + (n - i).min(m - j));
            }
            if lcss_distance(reach, m) > cutoff {
                return WarpingPathResults::ABANDONED;
            }
            std::mem::swap(&mut prev, &mut curr);
            std::mem::swap(&mut prev_dev, &mut curr_dev);
        }

        let distance = lcss_distance(prev[m], m);
        if distance > cutoff {
            return WarpingPathResults::ABANDONED;
        }
        WarpingPathResults {
            distance,
            min_window_validity: prev_dev[m].max(n.abs_diff(m)),
        }
    }
}

#[inline]
fn lcss_distance(matches: usize, min_len: usize) -> f64 {
    1.0 - matches as f64 / min_len as f64
}

impl ElasticDistance for Lcss {
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> f64 {
        self.table(a.as_slice(), b.as_slice(), f64::INFINITY).distance
    }

    fn distance_extended(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        cutoff: f64,
    ) -> WarpingPathResults {
        self.table(a.as_slice(), b.as_slice(), cutoff)
    }
}
