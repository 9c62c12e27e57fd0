//! Sliding-window upper and lower envelopes.

use std::collections::VecDeque;

use crate::window::Window;

/// Precomputed upper and lower envelope of a sequence for one window.
///
/// `upper[i]` is the maximum of `values[j]` over `|i - j| <= w` and `lower[i]` the minimum.
/// An unconstrained window yields the global max/min repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl Envelope {
    /// Compute both envelopes in O(n) with monotonic deques.
    #[must_use]
    pub fn compute(values: &[f64], window: Window) -> Self {
        let n = values.len();
        let radius = window.half_width().min(n);

        let mut upper = vec![0.0_f64; n];
        let mut lower = vec![0.0_f64; n];

        // Max deque: indices increasing, values decreasing (front is the window max).
        // Min deque: indices increasing, values increasing (front is the window min).
        let mut max_deque: VecDeque<usize> = VecDeque::new();
        let mut min_deque: VecDeque<usize> = VecDeque::new();
        let mut next_to_add: usize = 0;

        for i in 0..n {
            let hi = i.saturating_add(radius).min(n - 1);

            while next_to_add <= hi {
                while let Some(&back) = max_deque.back() {
                    if values[back] <= values[next_to_add] {
                        max_deque.pop_back();
                    } else {
                        break;
                    }
                }
                max_deque.push_back(next_to_add);

                while let Some(&back) = min_deque.back() {
                    if values[back] >= values[next_to_add] {
                        min_deque.pop_back();
                    } else {
                        break;
                    }
                }
                min_deque.push_back(next_to_add);

                next_to_add += 1;
            }

            let lo = i.saturating_sub(radius);
            while max_deque.front().is_some_and(|&front| front < lo) {
                max_deque.pop_front();
            }
            while min_deque.front().is_some_and(|&front| front < lo) {
                min_deque.pop_front();
            }

            // Index `i` itself is always inside its own window, so both fronts exist.
            if let (Some(&hi_idx), Some(&lo_idx)) = (max_deque.front(), min_deque.front()) {
                upper[i] = values[hi_idx];
                lower[i] = values[lo_idx];
            }
        }

        Self { upper, lower }
    }

    /// Return the upper envelope values.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Return the lower envelope values.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Return the length of the envelope (same as the original sequence).
    #[must_use]
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    /// Return true if the envelope is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(values: &[f64], w: usize) -> (Vec<f64>, Vec<f64>) {
        let n = values.len();
        (0..n)
            .map(|i| {
                let lo = i.saturating_sub(w);
                let hi = (i + w).min(n - 1);
                let slice = &values[lo..=hi];
                (
                    slice.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    slice.iter().copied().fold(f64::INFINITY, f64::min),
                )
            })
            .unzip()
    }

    #[test]
    fn matches_naive_sliding_window() {
        let data = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0];
        for w in 0..12 {
            let env = Envelope::compute(&data, Window::new(w));
            let (u, l) = naive(&data, w);
            assert_eq!(env.upper(), u.as_slice(), "upper mismatch for w={w}");
            assert_eq!(env.lower(), l.as_slice(), "lower mismatch for w={w}");
        }
    }

    #[test]
    fn unconstrained_is_global_extremes() {
        let data = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let env = Envelope::compute(&data, Window::UNCONSTRAINED);
        assert!(env.upper().iter().all(|&u| u == 9.0));
        assert!(env.lower().iter().all(|&l| l == 1.0));
    }

    #[test]
    fn radius_zero_equals_series() {
        let data = vec![3.0, 1.0, 4.0, 1.0, 5.0];
        let env = Envelope::compute(&data, Window::new(0));
        assert_eq!(env.upper(), data.as_slice());
        assert_eq!(env.lower(), data.as_slice());
    }

    #[test]
    fn upper_geq_lower() {
        let data = vec![0.5, -1.0, 2.0, 2.0, -3.0, 0.0];
        let env = Envelope::compute(&data, Window::new(2));
        for i in 0..env.len() {
            assert!(env.upper()[i] >= env.lower()[i]);
        }
    }
}
