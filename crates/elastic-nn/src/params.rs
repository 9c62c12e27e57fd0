//! Parameter grids: the mapping from `paramId` to concrete measure parameters.

use elastic_dist::{Dtw, Erp, Lcss, Measure, Msm, Params, Twe, Wdtw, Window};

use crate::dataset::Dataset;
use crate::error::NnError;

/// Number of entries in every standard grid.
pub const STANDARD_GRID_SIZE: usize = 100;

/// MSM split/merge costs: four geometric decades from 0.01 to 100, 25 linear steps each.
const MSM_COSTS: [f64; STANDARD_GRID_SIZE] = [
    0.01, 0.01375, 0.0175, 0.02125, 0.025, 0.02875, 0.0325, 0.03625, 0.04, 0.04375, 0.0475,
    0.05125, 0.055, 0.05875, 0.0625, 0.06625, 0.07, 0.07375, 0.0775, 0.08125, 0.085, 0.08875,
    0.0925, 0.09625, 0.1, 0.136, 0.172, 0.208, 0.244, 0.28, 0.316, 0.352, 0.388, 0.424, 0.46,
    0.496, 0.532, 0.568, 0.604, 0.64, 0.676, 0.712, 0.748, 0.784, 0.82, 0.856, 0.892, 0.928,
    0.964, 1.0, 1.36, 1.72, 2.08, 2.44, 2.8, 3.16, 3.52, 3.88, 4.24, 4.6, 4.96, 5.32, 5.68, 6.04,
    6.4, 6.76, 7.12, 7.48, 7.84, 8.2, 8.56, 8.92, 9.28, 9.64, 10.0, 13.6, 17.2, 20.8, 24.4, 28.0,
    31.6, 35.2, 38.8, 42.4, 46.0, 49.6, 53.2, 56.8, 60.4, 64.0, 67.6, 71.2, 74.8, 78.4, 82.0,
    85.6, 89.2, 92.8, 96.4, 100.0,
];

/// TWE stiffness values, indexed by the tens digit of `paramId`.
const TWE_NU: [f64; 10] = [1e-5, 1e-4, 5e-4, 1e-3, 5e-3, 1e-2, 5e-2, 0.1, 0.5, 1.0];

/// Map a standard `paramId` to parameters for a training set whose longest sequence has
/// `max_len` points and whose pooled values have standard deviation `std`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`NnError::InvalidParamId`] | `param_id >= 100` |
pub fn standard_params(measure: Measure, param_id: usize, max_len: usize, std: f64) -> Result<Params, NnError> {
    if param_id >= STANDARD_GRID_SIZE {
        return Err(NnError::InvalidParamId {
            param_id,
            grid_size: STANDARD_GRID_SIZE,
        });
    }
    let tens = (param_id / 10) as f64;
    let units = (param_id % 10) as f64;
    let band = || Window::from_fraction(0.25 * units / 9.0, max_len);
    let scaled_std = std * (0.2 + 0.8 * tens / 9.0);

    Ok(match measure {
        Measure::Dtw => Params::Dtw(Dtw::new(Window::from_fraction(param_id as f64 / 100.0, max_len))),
        Measure::Wdtw => Params::Wdtw(Wdtw::new(param_id as f64 / 100.0)),
        Measure::Erp => Params::Erp(Erp::new(band(), scaled_std)),
        Measure::Lcss => Params::Lcss(Lcss::new(band(), scaled_std)),
        Measure::Msm => Params::Msm(Msm::new(MSM_COSTS[param_id])),
        Measure::Twe => Params::Twe(Twe::new(TWE_NU[param_id / 10], 0.1 * units / 9.0)),
    })
}

/// An ordered list of parameter tuples of one measure.
///
/// Each entry keeps the `paramId` it was created under so a grid restricted to a single
/// entry still reports the original id.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    measure: Measure,
    params: Vec<Params>,
    ids: Vec<usize>,
}

impl ParameterGrid {
    /// The 100-entry standard grid of `measure`, scaled to `train`.
    #[must_use]
    pub fn standard(measure: Measure, train: &Dataset) -> Self {
        let max_len = train.max_len();
        let std = train.value_std();
        let params = (0..STANDARD_GRID_SIZE)
            .filter_map(|id| standard_params(measure, id, max_len, std).ok())
            .collect();
        Self {
            measure,
            params,
            ids: (0..STANDARD_GRID_SIZE).collect(),
        }
    }

    /// A grid from explicit parameter tuples; `paramId` is the position in the list.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::EmptyGrid`] | `params` is empty |
    /// | [`NnError::MixedGrid`] | An entry is not of `measure` |
    pub fn custom(measure: Measure, params: Vec<Params>) -> Result<Self, NnError> {
        if params.is_empty() {
            return Err(NnError::EmptyGrid);
        }
        if let Some((index, p)) = params.iter().enumerate().find(|(_, p)| p.measure() != measure) {
            return Err(NnError::MixedGrid {
                expected: measure,
                found: p.measure(),
                index,
            });
        }
        let ids = (0..params.len()).collect();
        Ok(Self { measure, params, ids })
    }

    /// A grid holding only the entry with id `param_id`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NnError::InvalidParamId`] | No entry has id `param_id` |
    pub fn restrict(&self, param_id: usize) -> Result<Self, NnError> {
        let pos = self.ids.iter().position(|&id| id == param_id).ok_or(NnError::InvalidParamId {
            param_id,
            grid_size: self.params.len(),
        })?;
        Ok(Self {
            measure: self.measure,
            params: vec![self.params[pos]],
            ids: vec![param_id],
        })
    }

    #[must_use]
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// Return the parameters at grid position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len()`.
    #[must_use]
    pub fn get(&self, pos: usize) -> &Params {
        &self.params[pos]
    }

    #[must_use]
    pub fn params(&self) -> &[Params] {
        &self.params
    }

    /// Return the `paramId` of every position.
    #[must_use]
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Partition grid positions into chains of parameters that differ only by window.
    ///
    /// Chains appear in order of their first member; within a chain positions are sorted
    /// by window, widest first, keeping grid order among equal windows.
    #[must_use]
    pub fn chains(&self) -> Vec<Vec<usize>> {
        let mut chains: Vec<Vec<usize>> = Vec::new();
        for (pos, p) in self.params.iter().enumerate() {
            match chains.iter_mut().find(|c| self.params[c[0]].same_chain(p)) {
                Some(chain) => chain.push(pos),
                None => chains.push(vec![pos]),
            }
        }
        for chain in &mut chains {
            chain.sort_by(|&a, &b| {
                self.params[b]
                    .effective_window()
                    .cmp(&self.params[a].effective_window())
            });
        }
        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elastic_dist::Sequence;

    fn train() -> Dataset {
        Dataset::from_sequences(vec![
            Sequence::new(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, 0.0, 0.0], 0).unwrap(),
            Sequence::new(vec![1.0; 20], 1).unwrap(),
        ])
    }

    #[test]
    fn msm_costs_are_increasing_decades() {
        assert!(MSM_COSTS.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(MSM_COSTS[0], 0.01);
        assert_eq!(MSM_COSTS[24], 0.1);
        assert_eq!(MSM_COSTS[49], 1.0);
        assert_eq!(MSM_COSTS[74], 10.0);
        assert_eq!(MSM_COSTS[99], 100.0);
    }

    #[test]
    fn dtw_windows_scale_with_length() {
        assert_eq!(standard_params(Measure::Dtw, 0, 20, 1.0).unwrap(), Params::Dtw(Dtw::new(Window::new(0))));
        assert_eq!(standard_params(Measure::Dtw, 10, 20, 1.0).unwrap(), Params::Dtw(Dtw::new(Window::new(2))));
        assert_eq!(standard_params(Measure::Dtw, 99, 20, 1.0).unwrap(), Params::Dtw(Dtw::new(Window::new(20))));
    }

    #[test]
    fn erp_digits() {
        let p = standard_params(Measure::Erp, 99, 36, 2.0).unwrap();
        assert_eq!(p, Params::Erp(Erp::new(Window::new(9), 2.0)));
        let p = standard_params(Measure::Erp, 0, 36, 2.0).unwrap();
        assert_eq!(p, Params::Erp(Erp::new(Window::new(0), 0.4)));
    }

    #[test]
    fn twe_digits() {
        let p = standard_params(Measure::Twe, 59, 10, 1.0).unwrap();
        assert_eq!(p, Params::Twe(Twe::new(1e-2, 0.1)));
    }

    #[test]
    fn out_of_range_id() {
        assert!(matches!(
            standard_params(Measure::Msm, 100, 10, 1.0),
            Err(NnError::InvalidParamId { param_id: 100, grid_size: 100 })
        ));
    }

    #[test]
    fn standard_grid_chains() {
        let t = train();
        let dtw = ParameterGrid::standard(Measure::Dtw, &t);
        assert_eq!(dtw.len(), 100);
        let chains = dtw.chains();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0][0], 99);

        let erp = ParameterGrid::standard(Measure::Erp, &t);
        let chains = erp.chains();
        assert_eq!(chains.len(), 10);
        assert!(chains.iter().all(|c| c.len() == 10));
        assert_eq!(chains[0][0], 9);

        assert_eq!(ParameterGrid::standard(Measure::Msm, &t).chains().len(), 100);
    }

    #[test]
    fn custom_grid_validation() {
        assert!(matches!(ParameterGrid::custom(Measure::Dtw, vec![]), Err(NnError::EmptyGrid)));
        let mixed = vec![Params::Dtw(Dtw::new(Window::new(1))), Params::Msm(Msm::new(1.0))];
        assert!(matches!(
            ParameterGrid::custom(Measure::Dtw, mixed),
            Err(NnError::MixedGrid { index: 1, found: Measure::Msm, .. })
        ));
    }

    #[test]
    fn restrict_keeps_original_id() {
        let grid = ParameterGrid::standard(Measure::Wdtw, &train());
        let single = grid.restrict(42).unwrap();
        assert_eq!(single.ids(), &[42]);
        assert_eq!(single.get(0), grid.get(42));
        assert!(grid.restrict(100).is_err());
    }
}
