//! Labelled training and test sets.

use elastic_dist::{Sequence, mean_std};

use crate::error::NnError;

/// An immutable collection of labelled sequences with dense class labels `0..n_classes`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    sequences: Vec<Sequence>,
    n_classes: usize,
}

impl Dataset {
    /// Create a dataset with an explicit class count.
    ///
    /// Train and test splits should be built with the same `n_classes` so labels agree.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::LabelOutOfRange`] | A label is `>= n_classes` |
    pub fn new(sequences: Vec<Sequence>, n_classes: usize) -> Result<Self, NnError> {
        if let Some((index, s)) = sequences.iter().enumerate().find(|(_, s)| s.label() >= n_classes) {
            return Err(NnError::LabelOutOfRange {
                index,
                label: s.label(),
                n_classes,
            });
        }
        Ok(Self { sequences, n_classes })
    }

    /// Create a dataset whose class count is one more than the largest label.
    #[must_use]
    pub fn from_sequences(sequences: Vec<Sequence>) -> Self {
        let n_classes = sequences.iter().map(Sequence::label).max().map_or(0, |m| m + 1);
        Self { sequences, n_classes }
    }

    #[must_use]
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Return the sequence at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> &Sequence {
        &self.sequences[index]
    }

    /// Return the label of the sequence at `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> usize {
        self.sequences[index].label()
    }

    /// Return all labels in order.
    #[must_use]
    pub fn labels(&self) -> Vec<usize> {
        self.sequences.iter().map(Sequence::label).collect()
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Length of the longest sequence, `0` when empty.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.sequences.iter().map(Sequence::len).max().unwrap_or(0)
    }

    /// Population standard deviation of all values of all sequences pooled together.
    #[must_use]
    pub fn value_std(&self) -> f64 {
        let pooled: Vec<f64> = self.sequences.iter().flat_map(|s| s.values().iter().copied()).collect();
        mean_std(&pooled).1
    }

    /// Number of sequences per class.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for s in &self.sequences {
            counts[s.label()] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: &[f64], label: usize) -> Sequence {
        Sequence::new(values.to_vec(), label).unwrap()
    }

    #[test]
    fn rejects_label_out_of_range() {
        let err = Dataset::new(vec![seq(&[1.0], 0), seq(&[2.0], 2)], 2).unwrap_err();
        assert!(matches!(err, NnError::LabelOutOfRange { index: 1, label: 2, n_classes: 2 }));
    }

    #[test]
    fn infers_class_count() {
        let d = Dataset::from_sequences(vec![seq(&[1.0], 0), seq(&[2.0, 3.0], 3)]);
        assert_eq!(d.n_classes(), 4);
        assert_eq!(d.class_counts(), vec![1, 0, 0, 1]);
        assert_eq!(d.max_len(), 2);
        assert_eq!(d.labels(), vec![0, 3]);
    }

    #[test]
    fn pooled_std() {
        let d = Dataset::from_sequences(vec![seq(&[2.0, 4.0, 4.0, 4.0], 0), seq(&[5.0, 5.0, 7.0, 9.0], 1)]);
        assert_eq!(d.value_std(), 2.0);
    }

    #[test]
    fn empty_dataset() {
        let d = Dataset::from_sequences(Vec::new());
        assert!(d.is_empty());
        assert_eq!(d.n_classes(), 0);
        assert_eq!(d.max_len(), 0);
        assert_eq!(d.value_std(), 0.0);
    }
}
