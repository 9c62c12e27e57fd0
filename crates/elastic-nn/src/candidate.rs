//! Per-(parameter, instance) nearest-neighbour candidates with tie-aware class votes.

/// How much is known about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Best neighbour found so far; a closer one may still exist.
    #[default]
    BestCandidate,
    /// Proven nearest neighbour among all instances considered so far.
    Nn,
}

/// Best known neighbour of one instance under one parameter tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateNn {
    /// Smallest training index among the neighbours tied at `distance`.
    pub neighbour: Option<usize>,
    /// Distance to the neighbour, `+inf` while none is known.
    pub distance: f64,
    /// Smallest window for which `distance` stays exact (largest validity over tied neighbours).
    pub r: usize,
    pub status: Status,
}

impl Default for CandidateNn {
    fn default() -> Self {
        Self {
            neighbour: None,
            distance: f64::INFINITY,
            r: 0,
            status: Status::BestCandidate,
        }
    }
}

/// Class with the most votes; equal counts go to the class whose earliest neighbour index
/// is smallest. `None` when no class has a vote.
#[must_use]
pub fn vote_winner(votes: &[u32], earliest: &[usize]) -> Option<usize> {
    (0..votes.len())
        .filter(|&c| votes[c] > 0)
        .min_by(|&a, &b| votes[b].cmp(&votes[a]).then(earliest[a].cmp(&earliest[b])))
}

/// Arena of candidates indexed by `(param, instance)` plus their vote histograms.
///
/// For every candidate the table keeps, per class, the number of neighbours tied at the
/// best distance and the smallest training index among them. Both are independent of the
/// order in which neighbours are offered.
#[derive(Debug, Clone)]
pub struct CandidateTable {
    n_params: usize,
    n_instances: usize,
    n_classes: usize,
    labels: Vec<usize>,
    candidates: Vec<CandidateNn>,
    votes: Vec<u32>,
    earliest: Vec<usize>,
}

impl CandidateTable {
    /// Create an empty table for `labels.len()` instances.
    ///
    /// # Panics
    ///
    /// Panics if a label is `>= n_classes`.
    #[must_use]
    pub fn new(n_params: usize, labels: Vec<usize>, n_classes: usize) -> Self {
        assert!(
            labels.iter().all(|&l| l < n_classes),
            "label out of range for {n_classes} classes"
        );
        let n_instances = labels.len();
        let cells = n_params * n_instances;
        Self {
            n_params,
            n_instances,
            n_classes,
            labels,
            candidates: vec![CandidateNn::default(); cells],
            votes: vec![0; cells * n_classes],
            earliest: vec![usize::MAX; cells * n_classes],
        }
    }

    #[must_use]
    pub fn n_params(&self) -> usize {
        self.n_params
    }

    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.n_instances
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn cell(&self, p: usize, i: usize) -> usize {
        debug_assert!(p < self.n_params && i < self.n_instances);
        p * self.n_instances + i
    }

    fn class_range(&self, cell: usize) -> std::ops::Range<usize> {
        cell * self.n_classes..(cell + 1) * self.n_classes
    }

    #[must_use]
    pub fn get(&self, p: usize, i: usize) -> &CandidateNn {
        &self.candidates[self.cell(p, i)]
    }

    /// Return the current best distance of instance `i` under parameter `p`.
    #[must_use]
    pub fn best_distance(&self, p: usize, i: usize) -> f64 {
        self.get(p, i).distance
    }

    /// Vote counts of the neighbours tied at the best distance, indexed by class.
    #[must_use]
    pub fn votes(&self, p: usize, i: usize) -> &[u32] {
        &self.votes[self.class_range(self.cell(p, i))]
    }

    /// Offer `neighbour` at distance `d` (valid down to window `r`) to instance `i`.
    ///
    /// A strictly smaller distance replaces the candidate and restarts the votes; an equal
    /// one adds a vote for the neighbour's class. Returns true if the table changed.
    /// Infinite distances are never recorded.
    pub fn offer(&mut self, p: usize, i: usize, neighbour: usize, d: f64, r: usize) -> bool {
        if !d.is_finite() {
            return false;
        }
        let cell = self.cell(p, i);
        let range = self.class_range(cell);
        let class = self.labels[neighbour];
        let cand = &mut self.candidates[cell];

        if d < cand.distance {
            *cand = CandidateNn {
                neighbour: Some(neighbour),
                distance: d,
                r,
                status: Status::BestCandidate,
            };
            self.votes[range.clone()].fill(0);
            self.earliest[range.clone()].fill(usize::MAX);
        } else if d == cand.distance {
            cand.neighbour = cand.neighbour.map(|n| n.min(neighbour)).or(Some(neighbour));
            cand.r = cand.r.max(r);
        } else {
            return false;
        }
        let slot = range.start + class;
        self.votes[slot] += 1;
        self.earliest[slot] = self.earliest[slot].min(neighbour);
        true
    }

    /// Mark the candidate of instance `i` under `p` as the proven nearest neighbour.
    pub fn mark_nn(&mut self, p: usize, i: usize) {
        let cell = self.cell(p, i);
        self.candidates[cell].status = Status::Nn;
    }

    /// Copy the candidate and votes of instance `i` from `from` to `to`, with `Nn` status.
    pub fn copy_candidate(&mut self, from: usize, to: usize, i: usize) {
        let (src, dst) = (self.cell(from, i), self.cell(to, i));
        self.candidates[dst] = CandidateNn {
            status: Status::Nn,
            ..self.candidates[src]
        };
        let (src_range, dst_start) = (self.class_range(src), self.class_range(dst).start);
        self.votes.copy_within(src_range.clone(), dst_start);
        self.earliest.copy_within(src_range, dst_start);
    }

    /// Predicted class of instance `i` under parameter `p`.
    ///
    /// The class with the most tied votes wins; a vote tie goes to the class whose earliest
    /// tied neighbour comes first in training order. `None` when no neighbour is known.
    #[must_use]
    pub fn predict(&self, p: usize, i: usize) -> Option<usize> {
        let range = self.class_range(self.cell(p, i));
        vote_winner(&self.votes[range.clone()], &self.earliest[range])
    }

    /// Number of instances whose prediction under `p` equals their own label.
    #[must_use]
    pub fn correct(&self, p: usize) -> usize {
        (0..self.n_instances)
            .filter(|&i| self.predict(p, i) == Some(self.labels[i]))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CandidateTable {
        // instances 0..5 with labels 0, 1, 1, 0, 2
        CandidateTable::new(2, vec![0, 1, 1, 0, 2], 3)
    }

    #[test]
    fn empty_candidate_has_no_prediction() {
        let t = table();
        assert_eq!(t.predict(0, 0), None);
        assert_eq!(t.best_distance(0, 0), f64::INFINITY);
        assert_eq!(t.correct(0), 0);
    }

    #[test]
    fn strict_improvement_resets_votes() {
        let mut t = table();
        assert!(t.offer(0, 0, 1, 3.0, 2));
        assert!(t.offer(0, 0, 2, 3.0, 1));
        assert_eq!(t.votes(0, 0), &[0, 2, 0]);
        assert!(t.offer(0, 0, 4, 1.0, 0));
        assert_eq!(t.votes(0, 0), &[0, 0, 1]);
        assert_eq!(t.get(0, 0).neighbour, Some(4));
        assert_eq!(t.predict(0, 0), Some(2));
        assert!(!t.offer(0, 0, 3, 2.0, 0));
        assert!(!t.offer(0, 0, 3, f64::INFINITY, 0));
    }

    #[test]
    fn ties_accumulate_and_keep_smallest_index() {
        let mut t = table();
        t.offer(0, 4, 3, 1.0, 1);
        t.offer(0, 4, 1, 1.0, 4);
        let c = t.get(0, 4);
        assert_eq!(c.neighbour, Some(1));
        assert_eq!(c.r, 4);
        assert_eq!(t.votes(0, 4), &[1, 1, 0]);
    }

    #[test]
    fn vote_tie_goes_to_first_in_training_order() {
        let mut t = table();
        // class 1 via instance 2, class 0 via instance 3: both one vote
        t.offer(0, 4, 3, 1.0, 0);
        t.offer(0, 4, 2, 1.0, 0);
        assert_eq!(t.predict(0, 4), Some(1));
        // a second class-0 neighbour outvotes
        t.offer(0, 4, 0, 1.0, 0);
        assert_eq!(t.predict(0, 4), Some(0));
    }

    #[test]
    fn order_of_offers_does_not_matter() {
        let offers = [(1, 2.0), (3, 1.0), (2, 1.0), (0, 1.5)];
        let mut a = table();
        let mut b = table();
        for &(n, d) in &offers {
            a.offer(1, 4, n, d, n);
        }
        for &(n, d) in offers.iter().rev() {
            b.offer(1, 4, n, d, n);
        }
        assert_eq!(a.get(1, 4), b.get(1, 4));
        assert_eq!(a.votes(1, 4), b.votes(1, 4));
        assert_eq!(a.predict(1, 4), b.predict(1, 4));
    }

    #[test]
    fn copy_marks_nn_and_clones_votes() {
        let mut t = table();
        t.offer(0, 2, 0, 0.5, 3);
        t.offer(0, 2, 3, 0.5, 1);
        t.mark_nn(0, 2);
        assert_eq!(t.get(0, 2).status, Status::Nn);
        t.copy_candidate(0, 1, 2);
        assert_eq!(t.get(1, 2), t.get(0, 2));
        assert_eq!(t.votes(1, 2), &[2, 0, 0]);
        assert_eq!(t.predict(1, 2), Some(0));
        // the source is untouched by later offers to the copy
        t.offer(1, 2, 1, 0.1, 0);
        assert_eq!(t.votes(0, 2), &[2, 0, 0]);
    }

    #[test]
    fn correct_counts_matching_labels() {
        let mut t = table();
        t.offer(0, 0, 3, 1.0, 0);
        t.offer(0, 1, 2, 1.0, 0);
        t.offer(0, 2, 4, 1.0, 0);
        assert_eq!(t.correct(0), 2);
    }
}
