//! Per-sequence statistics and lazily memoised envelopes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::envelope::Envelope;
use crate::series::Sequence;
use crate::window::Window;

/// Statistics of one sequence used by the lower bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    min: f64,
    max: f64,
    min_index: usize,
    max_index: usize,
    len: usize,
    /// Indices sorted by `|v - mean|`, largest first; ties keep index order.
    deviation_order: Vec<usize>,
}

impl SeriesStats {
    /// Compute the statistics of `values`.
    ///
    /// On repeated extremes the first occurrence is recorded.
    #[must_use]
    pub fn compute(values: &[f64]) -> Self {
        let mut min_index = 0;
        let mut max_index = 0;
        for (i, &v) in values.iter().enumerate() {
            if v < values[min_index] {
                min_index = i;
            }
            if v > values[max_index] {
                max_index = i;
            }
        }
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        let mut deviation_order: Vec<usize> = (0..values.len()).collect();
        deviation_order
            .sort_by(|&a, &b| (values[b] - mean).abs().total_cmp(&(values[a] - mean).abs()));

        Self {
            min: values.get(min_index).copied().unwrap_or(0.0),
            max: values.get(max_index).copied().unwrap_or(0.0),
            min_index,
            max_index,
            len: values.len(),
            deviation_order,
        }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Return true if the minimum sits at the first position.
    #[must_use]
    pub fn is_min_first(&self) -> bool {
        self.min_index == 0
    }

    /// Return true if the minimum sits at the last position.
    #[must_use]
    pub fn is_min_last(&self) -> bool {
        self.min_index + 1 == self.len
    }

    #[must_use]
    pub fn is_max_first(&self) -> bool {
        self.max_index == 0
    }

    #[must_use]
    pub fn is_max_last(&self) -> bool {
        self.max_index + 1 == self.len
    }

    /// Index of the `n`-th most deviating point (0 = farthest from the mean).
    ///
    /// # Panics
    ///
    /// Panics if `n >= len`.
    #[must_use]
    pub fn nth_highest_deviation_index(&self, n: usize) -> usize {
        self.deviation_order[n]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Statistics for every sequence of a dataset, plus envelopes computed on demand.
///
/// Envelopes are keyed by `(sequence index, window)` with the window clamped to the
/// sequence length, so all windows wider than a sequence share one entry. The memo uses
/// interior mutability and is meant to be owned by a single builder thread.
#[derive(Debug)]
pub struct SequenceStatsCache<'a> {
    sequences: &'a [Sequence],
    stats: Vec<SeriesStats>,
    envelopes: RefCell<HashMap<(usize, usize), Rc<Envelope>>>,
}

impl<'a> SequenceStatsCache<'a> {
    /// Precompute statistics for every sequence.
    #[must_use]
    #[instrument(skip_all, fields(n = sequences.len()))]
    pub fn new(sequences: &'a [Sequence]) -> Self {
        let stats: Vec<SeriesStats> = sequences.iter().map(|s| SeriesStats::compute(s.values())).collect();
        debug!(max_len = stats.iter().map(SeriesStats::len).max().unwrap_or(0), "sequence statistics ready");
        Self {
            sequences,
            stats,
            envelopes: RefCell::new(HashMap::new()),
        }
    }

    /// Return the underlying sequences.
    #[must_use]
    pub fn sequences(&self) -> &'a [Sequence] {
        self.sequences
    }

    /// Return the sequence at `idx`.
    #[must_use]
    pub fn sequence(&self, idx: usize) -> &'a Sequence {
        &self.sequences[idx]
    }

    /// Return the statistics of sequence `idx`.
    #[must_use]
    pub fn stats(&self, idx: usize) -> &SeriesStats {
        &self.stats[idx]
    }

    /// Return the envelope of sequence `idx` for `window`, computing it on first use.
    #[must_use]
    pub fn envelope(&self, idx: usize, window: Window) -> Rc<Envelope> {
        let values = self.sequences[idx].values();
        let key = (idx, window.half_width().min(values.len()));
        Rc::clone(
            self.envelopes
                .borrow_mut()
                .entry(key)
                .or_insert_with(|| Rc::new(Envelope::compute(values, Window::new(key.1)))),
        )
    }

    #[must_use]
    pub fn nth_highest_deviation_index(&self, idx: usize, n: usize) -> usize {
        self.stats[idx].nth_highest_deviation_index(n)
    }

    #[must_use]
    pub fn min(&self, idx: usize) -> f64 {
        self.stats[idx].min()
    }

    #[must_use]
    pub fn max(&self, idx: usize) -> f64 {
        self.stats[idx].max()
    }

    /// Number of sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
