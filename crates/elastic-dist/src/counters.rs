//! Instrumentation counters, passed explicitly instead of living in globals.

use std::ops::AddAssign;

/// Work counters incremented by kernels, bounds, and builders.
///
/// Purely observational: nothing reads these to make decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Counters {
    /// Number of distance kernel invocations.
    pub distance_calls: u64,
    /// Number of kernel invocations that exceeded a finite cutoff and returned `+inf`.
    pub early_abandons: u64,
    /// Number of lower-bound evaluations (corner or envelope, full or resumed).
    pub lower_bound_calls: u64,
    /// Number of challengers discarded by a lower bound.
    pub lower_bound_prunes: u64,
}

impl Counters {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one kernel call made with `cutoff`, and whether it abandoned.
    ///
    /// Without a finite cutoff an infinite result only means the window excludes the end
    /// cell, which is not an abandon.
    pub fn record_distance(&mut self, result: f64, cutoff: f64) {
        self.distance_calls += 1;
        if result == f64::INFINITY && cutoff.is_finite() {
            self.early_abandons += 1;
        }
    }
}

impl AddAssign for Counters {
    fn add_assign(&mut self, rhs: Self) {
        self.distance_calls += rhs.distance_calls;
        self.early_abandons += rhs.early_abandons;
        self.lower_bound_calls += rhs.lower_bound_calls;
        self.lower_bound_prunes += rhs.lower_bound_prunes;
    }
}
