//! Lazy, resumable assessment of one (query, reference) pair.
//!
//! An assessment walks a ladder of increasingly expensive evidence, corner bound, envelope
//! bound in each direction, then the distance itself, and stops as soon as it can either
//! rule the pair out against a score or deliver the confirmed distance. Work already done is
//! banked: paused envelope scans resume, abandoned distances remember the cutoff they beat,
//! and full distances survive window changes that stay above their validity.

use elastic_dist::{
    Counters, ElasticDistance, EnvelopeScan, Params, SequenceStatsCache, corner_bound, deflate,
    envelope_bound,
};

/// Discount applied to a distance computed under a wider window when it is only used to rank.
const PREVIOUS_DISTANCE_DISCOUNT: f64 = 0.8;

/// Progress of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessState {
    /// Nothing computed for the current parameter chain.
    Fresh,
    /// Corner bound computed.
    Kim,
    /// Query-against-reference envelope scan paused.
    PartialKeoghQr,
    /// Query-against-reference envelope scan complete.
    FullKeoghQr,
    /// Reference-against-query envelope scan paused.
    PartialKeoghRq,
    /// Reference-against-query envelope scan complete.
    FullKeoghRq,
    /// A distance from a wider window is held as a lower bound.
    PreviousDistance,
    /// The distance abandoned against some cutoff, so it is known to exceed it.
    PartialDistance,
    /// The exact distance for the current window is known.
    FullDistance,
}

/// Result of [`LazyAssessNn::try_to_beat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A lower bound exceeds the score.
    PrunedWithLowerBound,
    /// The distance, complete or abandoned, exceeds the score.
    PrunedWithDistance,
    /// The exact distance is at most the score and is available from [`LazyAssessNn::distance`].
    NewBest,
}

/// Assessment of one unordered pair, reused across a whole parameter sweep.
#[derive(Debug)]
pub struct LazyAssessNn<'c, 'a> {
    cache: &'c SequenceStatsCache<'a>,
    query: usize,
    reference: usize,
    eap: bool,
    params: Option<Params>,
    state: AssessState,
    scan_qr: EnvelopeScan,
    scan_rq: EnvelopeScan,
    lower_bound: f64,
    abandoned_below: f64,
    distance: f64,
    validity: usize,
}

impl<'c, 'a> LazyAssessNn<'c, 'a> {
    /// Pair sequences `a` and `b` of `cache`; the smaller index becomes the query.
    ///
    /// With `eap` off every call computes the full distance and no bound is consulted.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`.
    #[must_use]
    pub fn new(cache: &'c SequenceStatsCache<'a>, a: usize, b: usize, eap: bool) -> Self {
        assert_ne!(a, b, "an instance cannot be assessed against itself");
        Self {
            cache,
            query: a.min(b),
            reference: a.max(b),
            eap,
            params: None,
            state: AssessState::Fresh,
            scan_qr: EnvelopeScan::new(),
            scan_rq: EnvelopeScan::new(),
            lower_bound: 0.0,
            abandoned_below: f64::NEG_INFINITY,
            distance: f64::INFINITY,
            validity: 0,
        }
    }

    #[must_use]
    pub fn query(&self) -> usize {
        self.query
    }

    #[must_use]
    pub fn reference(&self) -> usize {
        self.reference
    }

    /// Return the index of the pair member that is not `index`.
    #[must_use]
    pub fn other(&self, index: usize) -> usize {
        if index == self.query { self.reference } else { self.query }
    }

    #[must_use]
    pub fn state(&self) -> AssessState {
        self.state
    }

    fn reset(&mut self) {
        self.state = AssessState::Fresh;
        self.scan_qr = EnvelopeScan::new();
        self.scan_rq = EnvelopeScan::new();
        self.lower_bound = 0.0;
        self.abandoned_below = f64::NEG_INFINITY;
        self.distance = f64::INFINITY;
        self.validity = 0;
    }

    /// Switch to `params`, keeping whatever evidence remains valid.
    ///
    /// Evidence carries over only within a chain and only when the window shrinks: every
    /// bound and abandoned cutoff stays valid because a narrower window can only raise the
    /// distance. A full distance stays exact while the new window covers its validity and
    /// otherwise degrades to a lower bound. Envelope scans belong to the old window and
    /// restart.
    pub fn set_params(&mut self, params: &Params) {
        let Some(old) = self.params.replace(*params) else {
            self.reset();
            return;
        };
        if !old.same_chain(params) {
            self.reset();
            return;
        }
        let (old_w, new_w) = (old.effective_window(), params.effective_window());
        if new_w == old_w {
            return;
        }
        if new_w > old_w {
            self.reset();
            return;
        }

        self.scan_qr = EnvelopeScan::new();
        self.scan_rq = EnvelopeScan::new();
        match self.state {
            AssessState::FullDistance if new_w.half_width() < self.validity => {
                self.lower_bound = self.distance;
                self.state = AssessState::PreviousDistance;
            }
            AssessState::PartialKeoghQr
            | AssessState::FullKeoghQr
            | AssessState::PartialKeoghRq
            | AssessState::FullKeoghRq => self.state = AssessState::Kim,
            _ => {}
        }
    }

    /// Switch to `params` and make sure the corner bound is available for ranking.
    pub fn prepare(&mut self, params: &Params, counters: &mut Counters) {
        self.set_params(params);
        if self.eap && self.state == AssessState::Fresh {
            self.compute_corner(counters);
        }
    }

    /// Value used to order challengers, cheapest to prune first.
    ///
    /// Only affects how much work is done, never which neighbours are found.
    #[must_use]
    pub fn ranking(&self) -> f64 {
        match self.state {
            AssessState::FullDistance => self.distance,
            AssessState::PreviousDistance => self.lower_bound * PREVIOUS_DISTANCE_DISCOUNT,
            AssessState::PartialDistance => self.lower_bound.max(self.abandoned_below),
            _ => self.lower_bound,
        }
    }

    /// The confirmed distance under the current parameters.
    ///
    /// # Panics
    ///
    /// Panics unless the last [`try_to_beat`](Self::try_to_beat) left the distance complete.
    #[must_use]
    pub fn distance(&self) -> f64 {
        assert_eq!(
            self.state,
            AssessState::FullDistance,
            "distance read before it was computed for pair ({}, {})",
            self.query,
            self.reference
        );
        self.distance
    }

    /// Largest window deviation along the optimal path of the confirmed distance.
    ///
    /// # Panics
    ///
    /// Panics unless the distance is complete.
    #[must_use]
    pub fn min_window_validity(&self) -> usize {
        assert_eq!(
            self.state,
            AssessState::FullDistance,
            "validity read before the distance was computed for pair ({}, {})",
            self.query,
            self.reference
        );
        self.validity
    }

    fn compute_corner(&mut self, counters: &mut Counters) {
        let Some(params) = self.params else { return };
        let (q, r) = (self.query, self.reference);
        let kim = corner_bound(
            &params,
            self.cache.sequence(q).values(),
            self.cache.stats(q),
            self.cache.sequence(r).values(),
            self.cache.stats(r),
        );
        counters.lower_bound_calls += 1;
        self.lower_bound = self.lower_bound.max(kim);
        self.state = AssessState::Kim;
    }

    fn compute_distance(&mut self, params: &Params, score: f64, counters: &mut Counters) -> Outcome {
        let cutoff = if self.eap { score } else { f64::INFINITY };
        let result = params.distance_extended(
            self.cache.sequence(self.query).as_view(),
            self.cache.sequence(self.reference).as_view(),
            cutoff,
        );
        counters.record_distance(result.distance, cutoff);
        if result.is_abandoned() {
            self.state = AssessState::PartialDistance;
            self.abandoned_below = self.abandoned_below.max(score);
            return Outcome::PrunedWithDistance;
        }
        self.state = AssessState::FullDistance;
        self.distance = result.distance;
        self.validity = result.min_window_validity;
        self.lower_bound = result.distance;
        if result.distance <= score {
            Outcome::NewBest
        } else {
            Outcome::PrunedWithDistance
        }
    }

    /// Advance the assessment until it can either rule the pair out against `score` or
    /// confirm a distance no greater than `score` under `params`.
    pub fn try_to_beat(&mut self, score: f64, params: &Params, counters: &mut Counters) -> Outcome {
        self.set_params(params);
        if !self.eap {
            return match self.state {
                AssessState::FullDistance => self.settle(score),
                _ => self.compute_distance(params, score, counters),
            };
        }

        loop {
            match self.state {
                AssessState::Fresh => self.compute_corner(counters),
                AssessState::Kim => {
                    if self.bound_prunes(score, counters) {
                        return Outcome::PrunedWithLowerBound;
                    }
                    self.state = AssessState::PartialKeoghQr;
                }
                AssessState::PartialKeoghQr => {
                    counters.lower_bound_calls += 1;
                    let lb = envelope_bound(
                        params,
                        self.cache,
                        self.query,
                        self.reference,
                        &mut self.scan_qr,
                        score,
                    );
                    self.lower_bound = self.lower_bound.max(lb);
                    if self.scan_qr.is_complete(self.cache.sequence(self.query).len()) {
                        self.state = AssessState::FullKeoghQr;
                    } else if self.bound_prunes(score, counters) {
                        return Outcome::PrunedWithLowerBound;
                    }
                }
                AssessState::FullKeoghQr => {
                    if self.bound_prunes(score, counters) {
                        return Outcome::PrunedWithLowerBound;
                    }
                    self.state = AssessState::PartialKeoghRq;
                }
                AssessState::PartialKeoghRq => {
                    counters.lower_bound_calls += 1;
                    let lb = envelope_bound(
                        params,
                        self.cache,
                        self.reference,
                        self.query,
                        &mut self.scan_rq,
                        score,
                    );
                    self.lower_bound = self.lower_bound.max(lb);
                    if self.scan_rq.is_complete(self.cache.sequence(self.reference).len()) {
                        self.state = AssessState::FullKeoghRq;
                    } else if self.bound_prunes(score, counters) {
                        return Outcome::PrunedWithLowerBound;
                    }
                }
                AssessState::FullKeoghRq | AssessState::PreviousDistance => {
                    if self.bound_prunes(score, counters) {
                        return Outcome::PrunedWithLowerBound;
                    }
                    return self.compute_distance(params, score, counters);
                }
                AssessState::PartialDistance => {
                    if score <= self.abandoned_below {
                        return Outcome::PrunedWithDistance;
                    }
                    if self.bound_prunes(score, counters) {
                        return Outcome::PrunedWithLowerBound;
                    }
                    return self.compute_distance(params, score, counters);
                }
                AssessState::FullDistance => return self.settle(score),
            }
        }
    }

    fn settle(&self, score: f64) -> Outcome {
        if self.distance <= score {
            Outcome::NewBest
        } else {
            Outcome::PrunedWithDistance
        }
    }

    fn bound_prunes(&self, score: f64, counters: &mut Counters) -> bool {
        let prunes = deflate(self.lower_bound) > score;
        if prunes {
            counters.lower_bound_prunes += 1;
        }
        prunes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elastic_dist::{Dtw, Lcss, Msm, Sequence, Window};

    fn sequences() -> Vec<Sequence> {
        vec![
            Sequence::new(vec![0.0, 1.0, 3.0, 2.0, 1.0, 0.0, -1.0, 0.5], 0).unwrap(),
            Sequence::new(vec![0.2, 0.1, 1.2, 3.1, 2.2, 0.8, -0.6, 0.4], 1).unwrap(),
            Sequence::new(vec![5.0, 6.0, 7.0, 6.5, 5.5, 6.0, 7.5, 5.0], 1).unwrap(),
        ]
    }

    fn dtw(w: usize) -> Params {
        Params::Dtw(Dtw::new(Window::new(w)))
    }

    fn classic(seqs: &[Sequence], p: &Params, a: usize, b: usize) -> f64 {
        p.distance(seqs[a].as_view(), seqs[b].as_view())
    }

    #[test]
    fn canonical_order() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let a = LazyAssessNn::new(&cache, 2, 0, true);
        assert_eq!((a.query(), a.reference()), (0, 2));
        assert_eq!(a.other(2), 0);
        assert_eq!(a.other(0), 2);
    }

    #[test]
    fn infinite_score_yields_classic_distance() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        for eap in [true, false] {
            let mut counters = Counters::new();
            let mut a = LazyAssessNn::new(&cache, 0, 1, eap);
            let outcome = a.try_to_beat(f64::INFINITY, &dtw(3), &mut counters);
            assert_eq!(outcome, Outcome::NewBest);
            assert_eq!(a.distance(), classic(&seqs, &dtw(3), 0, 1));
            assert_eq!(counters.distance_calls, 1);
        }
    }

    #[test]
    fn far_pair_is_pruned_by_bounds() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let mut counters = Counters::new();
        let mut a = LazyAssessNn::new(&cache, 0, 2, true);
        let outcome = a.try_to_beat(1.0, &dtw(2), &mut counters);
        assert_eq!(outcome, Outcome::PrunedWithLowerBound);
        assert_eq!(counters.distance_calls, 0);
        assert_eq!(counters.lower_bound_prunes, 1);
        assert!(a.ranking() > 1.0);
    }

    #[test]
    fn abandoned_distance_is_banked() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let p = dtw(1);
        let d = classic(&seqs, &p, 0, 1);
        let mut counters = Counters::new();
        let mut a = LazyAssessNn::new(&cache, 0, 1, true);
        // a score just below the distance either prunes on a bound or abandons the kernel
        let outcome = a.try_to_beat(d * 0.999, &p, &mut counters);
        assert_ne!(outcome, Outcome::NewBest);
        let calls = counters.distance_calls;
        // a smaller score is answered without touching the kernel again
        assert_ne!(a.try_to_beat(d * 0.5, &p, &mut counters), Outcome::NewBest);
        assert_eq!(counters.distance_calls, calls);
        // a larger score completes the distance
        assert_eq!(a.try_to_beat(d, &p, &mut counters), Outcome::NewBest);
        assert_eq!(a.distance(), d);
    }

    #[test]
    fn full_distance_survives_window_above_validity() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let mut counters = Counters::new();
        let mut a = LazyAssessNn::new(&cache, 0, 1, true);
        assert_eq!(a.try_to_beat(f64::INFINITY, &dtw(8), &mut counters), Outcome::NewBest);
        let validity = a.min_window_validity();
        let d = a.distance();
        let calls = counters.distance_calls;

        a.set_params(&dtw(validity));
        assert_eq!(a.state(), AssessState::FullDistance);
        assert_eq!(a.try_to_beat(f64::INFINITY, &dtw(validity), &mut counters), Outcome::NewBest);
        assert_eq!(a.distance(), d);
        assert_eq!(counters.distance_calls, calls);
        assert_eq!(d, classic(&seqs, &dtw(validity), 0, 1));
    }

    #[test]
    fn shrinking_below_validity_degrades_to_previous_distance() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let mut counters = Counters::new();
        let mut a = LazyAssessNn::new(&cache, 0, 1, true);
        a.try_to_beat(f64::INFINITY, &dtw(8), &mut counters);
        let validity = a.min_window_validity();
        assert!(validity > 0, "test pair must need warping");
        let d = a.distance();

        a.set_params(&dtw(validity - 1));
        assert_eq!(a.state(), AssessState::PreviousDistance);
        assert_eq!(a.ranking(), d * PREVIOUS_DISTANCE_DISCOUNT);
        assert_eq!(a.try_to_beat(f64::INFINITY, &dtw(validity - 1), &mut counters), Outcome::NewBest);
        assert_eq!(a.distance(), classic(&seqs, &dtw(validity - 1), 0, 1));
    }

    #[test]
    fn chain_change_resets() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let mut counters = Counters::new();
        let mut a = LazyAssessNn::new(&cache, 0, 1, true);
        a.try_to_beat(f64::INFINITY, &Params::Msm(Msm::new(0.5)), &mut counters);
        a.set_params(&Params::Msm(Msm::new(1.0)));
        assert_eq!(a.state(), AssessState::Fresh);
        let lcss = Params::Lcss(Lcss::new(Window::new(2), 0.3));
        assert_eq!(a.try_to_beat(f64::INFINITY, &lcss, &mut counters), Outcome::NewBest);
        assert_eq!(a.distance(), classic(&seqs, &lcss, 0, 1));
    }

    #[test]
    fn prepare_computes_corner_bound() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let mut counters = Counters::new();
        let mut a = LazyAssessNn::new(&cache, 1, 2, true);
        a.prepare(&dtw(1), &mut counters);
        assert_eq!(a.state(), AssessState::Kim);
        assert!(a.ranking() > 0.0);
        assert!(a.ranking() <= classic(&seqs, &dtw(1), 1, 2));
    }

    #[test]
    #[should_panic(expected = "distance read before")]
    fn reading_distance_early_panics() {
        let seqs = sequences();
        let cache = SequenceStatsCache::new(&seqs);
        let a = LazyAssessNn::new(&cache, 0, 1, true);
        let _ = a.distance();
    }
}
