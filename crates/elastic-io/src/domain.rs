//! Domain types for elastic-io.

use std::collections::HashMap;

use elastic_nn::Dataset;

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from raw class labels to dense indices, in first-seen order.
///
/// Numeric labels are keyed by value, so `1`, `1.0` and `1e0` are the same class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    index: HashMap<String, usize>,
    raw: Vec<String>,
}

impl LabelMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(raw: &str) -> String {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => format!("{v}"),
            _ => trimmed.to_owned(),
        }
    }

    /// Return the dense index of `raw`, assigning the next free one on first sight.
    pub fn intern(&mut self, raw: &str) -> usize {
        let key = Self::key(raw);
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.raw.len();
        self.index.insert(key, i);
        self.raw.push(raw.trim().to_owned());
        i
    }

    /// Return the dense index of `raw` without assigning one.
    #[must_use]
    pub fn get(&self, raw: &str) -> Option<usize> {
        self.index.get(&Self::key(raw)).copied()
    }

    /// Raw label of dense index `i`, as first seen.
    #[must_use]
    pub fn raw(&self, i: usize) -> Option<&str> {
        self.raw.get(i).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// A train/test pair sharing one label mapping.
#[derive(Debug, Clone)]
pub struct UcrSplit {
    pub train: Dataset,
    pub test: Dataset,
    pub labels: LabelMap,
}
