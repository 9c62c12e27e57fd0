//! Configuration builder for elastic 1NN classifiers.

use std::fmt;

use elastic_dist::{Measure, Params};

use crate::classifier::ElasticClassifier;
use crate::error::NnError;

/// How the leave-one-out nearest-neighbour table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainingStrategy {
    /// One pass over the training set for the whole grid, with backward propagation.
    #[default]
    Incremental,
    /// Every grid entry on its own.
    PerParameter,
}

impl TrainingStrategy {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Incremental => "incremental",
            Self::PerParameter => "loocv0",
        }
    }
}

/// Which parameter tuples are searched.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GridKind {
    /// The 100-entry standard grid, scaled to the training set.
    #[default]
    Standard,
    /// An explicit list; `paramId` is the position in the list.
    Custom(Vec<Params>),
}

/// Configuration of an [`ElasticClassifier`].
///
/// Construct via [`ClassifierConfig::new`] or [`ClassifierConfig::from_name`], then chain
/// `with_*` methods.
///
/// # Defaults
///
/// | Parameter  | Default       |
/// |------------|---------------|
/// | `eap`      | `true`        |
/// | `strategy` | `Incremental` |
/// | `grid`     | `Standard`    |
/// | `param_id` | `None`        |
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub(crate) measure: Measure,
    pub(crate) eap: bool,
    pub(crate) strategy: TrainingStrategy,
    pub(crate) grid: GridKind,
    pub(crate) param_id: Option<usize>,
}

impl ClassifierConfig {
    /// Create a config for `measure` with default settings.
    #[must_use]
    pub fn new(measure: Measure) -> Self {
        Self {
            measure,
            eap: true,
            strategy: TrainingStrategy::default(),
            grid: GridKind::default(),
            param_id: None,
        }
    }

    /// Parse an identifier such as `dtw`, `msm-plain` or `lcss-eap-loocv0`.
    ///
    /// The first dash-separated part names the measure; the rest select `eap`/`plain`
    /// and `incremental`/`loocv0`, in any order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::UnknownMeasure`] | The first part is not a measure |
    /// | [`NnError::UnknownClassifier`] | A later part is not recognised |
    pub fn from_name(name: &str) -> Result<Self, NnError> {
        let mut parts = name.split('-');
        let measure: Measure = parts.next().unwrap_or_default().parse()?;
        let mut config = Self::new(measure);
        for part in parts {
            config = match part.to_ascii_lowercase().as_str() {
                "eap" => config.with_eap(true),
                "plain" => config.with_eap(false),
                "incremental" => config.with_strategy(TrainingStrategy::Incremental),
                "loocv0" => config.with_strategy(TrainingStrategy::PerParameter),
                _ => {
                    return Err(NnError::UnknownClassifier {
                        name: name.to_owned(),
                        part: part.to_owned(),
                    });
                }
            };
        }
        Ok(config)
    }

    // --- Setters ---

    /// Turn early abandoning and lower-bound pruning on or off.
    #[must_use]
    pub fn with_eap(mut self, eap: bool) -> Self {
        self.eap = eap;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: TrainingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fix the parameter instead of searching the grid. `None` searches the whole grid.
    #[must_use]
    pub fn with_param_id(mut self, param_id: Option<usize>) -> Self {
        self.param_id = param_id;
        self
    }

    /// Search an explicit list of parameter tuples instead of the standard grid.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::EmptyGrid`] | `params` is empty |
    /// | [`NnError::MixedGrid`] | An entry is not of the configured measure |
    pub fn with_custom_grid(mut self, params: Vec<Params>) -> Result<Self, NnError> {
        if params.is_empty() {
            return Err(NnError::EmptyGrid);
        }
        if let Some((index, p)) = params.iter().enumerate().find(|(_, p)| p.measure() != self.measure) {
            return Err(NnError::MixedGrid {
                expected: self.measure,
                found: p.measure(),
                index,
            });
        }
        self.grid = GridKind::Custom(params);
        Ok(self)
    }

    // --- Getters ---

    #[must_use]
    pub fn measure(&self) -> Measure {
        self.measure
    }

    #[must_use]
    pub fn eap(&self) -> bool {
        self.eap
    }

    #[must_use]
    pub fn strategy(&self) -> TrainingStrategy {
        self.strategy
    }

    #[must_use]
    pub fn grid(&self) -> &GridKind {
        &self.grid
    }

    #[must_use]
    pub fn param_id(&self) -> Option<usize> {
        self.param_id
    }

    /// Canonical identifier, accepted back by [`from_name`](Self::from_name).
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Create an untrained classifier with this configuration.
    #[must_use]
    pub fn build(&self) -> ElasticClassifier {
        ElasticClassifier::new(self.clone())
    }
}

impl fmt::Display for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eap = if self.eap { "eap" } else { "plain" };
        write!(f, "{}-{eap}-{}", self.measure, self.strategy.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elastic_dist::{Dtw, Msm, Window};

    #[test]
    fn defaults() {
        let c = ClassifierConfig::new(Measure::Erp);
        assert!(c.eap());
        assert_eq!(c.strategy(), TrainingStrategy::Incremental);
        assert_eq!(c.grid(), &GridKind::Standard);
        assert_eq!(c.param_id(), None);
        assert_eq!(c.name(), "erp-eap-incremental");
    }

    #[test]
    fn parses_names() {
        let c = ClassifierConfig::from_name("LCSS-plain-loocv0").unwrap();
        assert_eq!(c.measure(), Measure::Lcss);
        assert!(!c.eap());
        assert_eq!(c.strategy(), TrainingStrategy::PerParameter);
        assert_eq!(ClassifierConfig::from_name(&c.name()).unwrap(), c);
        assert_eq!(ClassifierConfig::from_name("twe").unwrap(), ClassifierConfig::new(Measure::Twe));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(matches!(
            ClassifierConfig::from_name("euclid"),
            Err(NnError::UnknownMeasure { .. })
        ));
        assert!(matches!(
            ClassifierConfig::from_name("dtw-fast"),
            Err(NnError::UnknownClassifier { part, .. }) if part == "fast"
        ));
        assert!(ClassifierConfig::from_name("").is_err());
    }

    #[test]
    fn custom_grid_must_match_measure() {
        let ok = ClassifierConfig::new(Measure::Dtw)
            .with_custom_grid(vec![Params::Dtw(Dtw::new(Window::new(1)))])
            .unwrap();
        assert!(matches!(ok.grid(), GridKind::Custom(v) if v.len() == 1));
        assert!(matches!(
            ClassifierConfig::new(Measure::Dtw).with_custom_grid(vec![Params::Msm(Msm::new(1.0))]),
            Err(NnError::MixedGrid { index: 0, .. })
        ));
        assert!(matches!(
            ClassifierConfig::new(Measure::Dtw).with_custom_grid(Vec::new()),
            Err(NnError::EmptyGrid)
        ));
    }
}
