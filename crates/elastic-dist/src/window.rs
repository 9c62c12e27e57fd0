//! Warping window (band) arithmetic.

use std::ops::RangeInclusive;

/// Half-width of the band around the diagonal: cell `(i, j)` is allowed iff `|i - j| <= w`.
///
/// [`Window::UNCONSTRAINED`] allows every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Window(usize);

impl Window {
    /// A window that never restricts the alignment.
    pub const UNCONSTRAINED: Self = Self(usize::MAX);

    /// Create a window of the given half-width.
    #[must_use]
    pub const fn new(half_width: usize) -> Self {
        Self(half_width)
    }

    /// Window covering `fraction` of `len`, rounded up.
    ///
    /// `fraction` is clamped to `[0, 1]`.
    #[must_use]
    pub fn from_fraction(fraction: f64, len: usize) -> Self {
        let f = fraction.clamp(0.0, 1.0);
        Self((f * len as f64).ceil() as usize)
    }

    /// Return the half-width.
    #[must_use]
    pub const fn half_width(self) -> usize {
        self.0
    }

    /// Return true if this window never restricts a pair of sequences of these lengths.
    #[must_use]
    pub fn covers(self, n: usize, m: usize) -> bool {
        self.0 >= n.max(m)
    }

    /// Return true if cell `(i, j)` lies inside the band.
    #[must_use]
    pub fn contains(self, i: usize, j: usize) -> bool {
        i.abs_diff(j) <= self.0
    }

    /// Inclusive column range of row `row` for a matrix with columns `0..=last_col`.
    ///
    /// Returns an empty range when the band misses the row entirely.
    #[must_use]
    pub fn column_range(self, row: usize, last_col: usize) -> RangeInclusive<usize> {
        let start = row.saturating_sub(self.0);
        let end = row.saturating_add(self.0).min(last_col);
        start..=end
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::UNCONSTRAINED
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::UNCONSTRAINED {
            f.write_str("unconstrained")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconstrained_full_range() {
        let w = Window::UNCONSTRAINED;
        assert_eq!(w.column_range(0, 9), 0..=9);
        assert_eq!(w.column_range(5, 9), 0..=9);
    }

    #[test]
    fn middle_row() {
        assert_eq!(Window::new(2).column_range(5, 9), 3..=7);
    }

    #[test]
    fn first_and_last_rows() {
        assert_eq!(Window::new(2).column_range(0, 9), 0..=2);
        assert_eq!(Window::new(2).column_range(9, 9), 7..=9);
    }

    #[test]
    fn band_misses_row() {
        assert!(Window::new(1).column_range(8, 3).is_empty());
    }

    #[test]
    fn from_fraction_rounds_up() {
        assert_eq!(Window::from_fraction(0.0, 50), Window::new(0));
        assert_eq!(Window::from_fraction(0.01, 50), Window::new(1));
        assert_eq!(Window::from_fraction(0.5, 50), Window::new(25));
        assert_eq!(Window::from_fraction(3.0, 50), Window::new(50));
    }

    #[test]
    fn covers_and_contains() {
        assert!(Window::new(5).covers(5, 3));
        assert!(!Window::new(4).covers(5, 3));
        assert!(Window::new(2).contains(4, 2));
        assert!(!Window::new(1).contains(4, 2));
    }

    #[test]
    fn default_is_unconstrained() {
        assert_eq!(Window::default(), Window::UNCONSTRAINED);
    }
}
