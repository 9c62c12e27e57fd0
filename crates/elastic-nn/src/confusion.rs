//! Confusion matrix over 1NN predictions, with per-class metrics.

use std::fmt;

use serde::Serialize;

/// Counts of true class against predicted class.
///
/// `matrix[t][p]` counts instances of class `t` predicted as `p`. Instances that received
/// no prediction (no finite-distance neighbour) are counted in `unclassified[t]` and are
/// never correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
    unclassified: Vec<usize>,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub class: usize,
    /// TP / (TP + FP), or 0 when the class was never predicted.
    pub precision: f64,
    /// TP / support, or 0 when the class has no instances.
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0 when both are 0.
    pub f1: f64,
    /// Number of instances of this class, classified or not.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Tally `predicted` against `truth`, pairing entries by position.
    ///
    /// # Panics
    ///
    /// Panics if a label or prediction is `>= n_classes`.
    #[must_use]
    pub fn from_predictions(truth: &[usize], predicted: &[Option<usize>], n_classes: usize) -> Self {
        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        let mut unclassified = vec![0usize; n_classes];
        for (&t, &p) in truth.iter().zip(predicted) {
            match p {
                Some(p) => matrix[t][p] += 1,
                None => unclassified[t] += 1,
            }
        }
        Self { matrix, unclassified }
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.matrix.len()
    }

    /// Number of correctly classified instances.
    #[must_use]
    pub fn correct(&self) -> usize {
        (0..self.n_classes()).map(|c| self.matrix[c][c]).sum()
    }

    /// Number of instances tallied, including unclassified ones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum::<usize>() + self.unclassified.iter().sum::<usize>()
    }

    /// Proportion of correct predictions, 0 for an empty matrix.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }

    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let n = self.n_classes();
        (0..n)
            .map(|c| {
                let tp = self.matrix[c][c];
                let predicted_as_c: usize = (0..n).map(|t| self.matrix[t][c]).sum();
                let support = self.matrix[c].iter().sum::<usize>() + self.unclassified[c];
                let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
                let precision = ratio(tp, predicted_as_c);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: c,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    #[must_use]
    pub fn unclassified(&self) -> &[usize] {
        &self.unclassified
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "")?;
        for j in 0..self.n_classes() {
            write!(f, " pred_{j:>3}")?;
        }
        writeln!(f, " {:>8}", "none")?;

        for (i, (row, none)) in self.matrix.iter().zip(&self.unclassified).enumerate() {
            write!(f, "true_{i:>3}")?;
            for val in row {
                write!(f, " {val:>8}")?;
            }
            writeln!(f, " {none:>8}")?;
        }
        Ok(())
    }
}
