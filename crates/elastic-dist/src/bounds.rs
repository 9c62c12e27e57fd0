//! Lower bounds on the elastic distances.
//!
//! Two families per measure: a constant-time corner bound built from the first and last
//! alignment steps, and an envelope bound accumulated point by point in deviation order.
//! The envelope scan is resumable: it stops as soon as it exceeds a threshold and can be
//! continued later against a larger one.

use crate::cache::{SequenceStatsCache, SeriesStats};
use crate::kernels::sq;
use crate::measure::Params;

/// Relative tolerance applied to stored bounds before they are compared with a distance.
pub const BOUND_TOLERANCE: f64 = 1e-9;

/// Shrink a bound by [`BOUND_TOLERANCE`] so float reassociation can never prune a tie.
#[must_use]
pub fn deflate(lb: f64) -> f64 {
    lb - BOUND_TOLERANCE * lb.abs()
}

/// Distance from `x` to the interval `[lo, hi]`.
#[inline]
fn gap(x: f64, lo: f64, hi: f64) -> f64 {
    if x > hi {
        x - hi
    } else if x < lo {
        lo - x
    } else {
        0.0
    }
}

/// Corner bound from the first and last alignment steps.
///
/// For DTW the min/max term is added only when no extreme of either sequence lies on a
/// first or last position, so it can never share a cell with the corner terms.
#[must_use]
pub fn corner_bound(
    params: &Params,
    q: &[f64],
    q_stats: &SeriesStats,
    r: &[f64],
    r_stats: &SeriesStats,
) -> f64 {
    let (Some(&q0), Some(&r0), Some(&qn), Some(&rm)) = (q.first(), r.first(), q.last(), r.last())
    else {
        return 0.0;
    };
    let has_last = q.len() + r.len() > 2;
    let last = |term: f64| if has_last { term } else { 0.0 };

    match params {
        Params::Dtw(_) => {
            let mut lb = sq(q0 - r0) + last(sq(qn - rm));
            if q.len() > 2 && r.len() > 2 {
                let mins_inside = !(q_stats.is_min_first()
                    || q_stats.is_min_last()
                    || r_stats.is_min_first()
                    || r_stats.is_min_last());
                let maxs_inside = !(q_stats.is_max_first()
                    || q_stats.is_max_last()
                    || r_stats.is_max_first()
                    || r_stats.is_max_last());
                let min_term = if mins_inside { sq(q_stats.min() - r_stats.min()) } else { 0.0 };
                let max_term = if maxs_inside { sq(q_stats.max() - r_stats.max()) } else { 0.0 };
                lb += min_term.max(max_term);
            }
            lb
        }
        Params::Erp(erp) => {
            let g = erp.g();
            let step = |a: f64, b: f64| sq(a - b).min(sq(a - g)).min(sq(b - g));
            step(q0, r0) + last(step(qn, rm))
        }
        Params::Wdtw(wdtw) => {
            let w0 = wdtw.weight(0, q.len().max(r.len()));
            w0 * (sq(q0 - r0) + last(sq(qn - rm)))
        }
        Params::Msm(msm) => (q0 - r0).abs() + last((qn - rm).abs().min(msm.cost())),
        Params::Twe(twe) => sq(q0 - r0) + last(sq(qn - rm).min(twe.nu() + twe.lambda())),
        Params::Lcss(_) => 0.0,
    }
}

/// Resumable state of an envelope bound: the accumulated value and the scan position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvelopeScan {
    accumulated: f64,
    next: usize,
}

impl EnvelopeScan {
    /// A scan that has not looked at any point yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points already accumulated.
    #[must_use]
    pub fn position(&self) -> usize {
        self.next
    }

    /// Return true once every point of a sequence of length `len` has been accumulated.
    #[must_use]
    pub fn is_complete(&self, len: usize) -> bool {
        self.next >= len
    }
}

/// Advance the envelope bound of sequence `x` against the envelope of sequence `env`.
///
/// Points of `x` are visited from most to least deviating and the scan pauses as soon
/// as the bound exceeds `threshold`. Returns the bound reached so far, which is a valid
/// lower bound whether or not the scan is complete. Sequences of different lengths
/// have no envelope bound; the scan completes immediately at `0`.
pub fn envelope_bound(
    params: &Params,
    cache: &SequenceStatsCache<'_>,
    x: usize,
    env: usize,
    scan: &mut EnvelopeScan,
    threshold: f64,
) -> f64 {
    let xs = cache.sequence(x).values();
    let n = xs.len();
    let m = cache.sequence(env).len();
    if n != m {
        scan.next = n;
        return 0.0;
    }

    let stats = cache.stats(x);
    match params {
        Params::Dtw(dtw) => {
            let e = cache.envelope(env, dtw.window());
            accumulate(xs, stats, scan, threshold, |v| v, |i, v| {
                sq(gap(v, e.lower()[i], e.upper()[i]))
            })
        }
        Params::Erp(erp) => {
            let e = cache.envelope(env, erp.window());
            let g = erp.g();
            accumulate(xs, stats, scan, threshold, |v| v, |i, v| {
                sq(gap(v, e.lower()[i].min(g), e.upper()[i].max(g)))
            })
        }
        Params::Lcss(lcss) => {
            let e = cache.envelope(env, lcss.window());
            let eps = lcss.epsilon();
            let min_len = n.min(m) as f64;
            accumulate(
                xs,
                stats,
                scan,
                threshold,
                |count| (1.0 - (n as f64 - count) / min_len).max(0.0),
                |i, v| {
                    if v < e.lower()[i] - eps || v > e.upper()[i] + eps { 1.0 } else { 0.0 }
                },
            )
        }
        Params::Wdtw(wdtw) => {
            let (lo, hi) = (cache.min(env), cache.max(env));
            let w0 = wdtw.weight(0, n.max(m));
            accumulate(xs, stats, scan, threshold, |v| v, |_, v| w0 * sq(gap(v, lo, hi)))
        }
        Params::Msm(msm) => {
            let (lo, hi) = (cache.min(env), cache.max(env));
            let c = msm.cost();
            accumulate(xs, stats, scan, threshold, |v| v, |_, v| gap(v, lo, hi).min(c))
        }
        Params::Twe(twe) => {
            let (lo, hi) = (cache.min(env), cache.max(env));
            let delete = twe.nu() + twe.lambda();
            accumulate(xs, stats, scan, threshold, |v| v, |_, v| sq(gap(v, lo, hi)).min(delete))
        }
    }
}

/// Full envelope bound with no early stop.
#[must_use]
pub fn full_envelope_bound(params: &Params, cache: &SequenceStatsCache<'_>, x: usize, env: usize) -> f64 {
    envelope_bound(params, cache, x, env, &mut EnvelopeScan::new(), f64::INFINITY)
}

fn accumulate(
    xs: &[f64],
    stats: &SeriesStats,
    scan: &mut EnvelopeScan,
    threshold: f64,
    finish: impl Fn(f64) -> f64,
    contribution: impl Fn(usize, f64) -> f64,
) -> f64 {
    while scan.next < xs.len() {
        let i = stats.nth_highest_deviation_index(scan.next);
        scan.accumulated += contribution(i, xs[i]);
        scan.next += 1;
        if finish(scan.accumulated) > threshold {
            break;
        }
    }
    finish(scan.accumulated)
}
