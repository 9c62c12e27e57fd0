//! Nearest-neighbour tables for leave-one-out cross-validation over a parameter grid.
//!
//! [`build_incremental`] solves every grid entry in one pass over the training set,
//! sharing one lazy assessment per pair across the whole grid and propagating proven
//! neighbours from wide windows to narrower ones. [`build_per_parameter`] computes each
//! entry independently. Both produce identical neighbours, distances and votes.

use elastic_dist::{Counters, ElasticDistance, SequenceStatsCache};
use tracing::{debug, instrument};

use crate::assess::{LazyAssessNn, Outcome};
use crate::candidate::{CandidateTable, Status};
use crate::dataset::Dataset;
use crate::error::NnError;
use crate::params::ParameterGrid;

fn check_size(train: &Dataset) -> Result<(), NnError> {
    if train.len() < 2 {
        return Err(NnError::InsufficientData {
            n_train: train.len(),
        });
    }
    Ok(())
}

// ── incremental ──────────────────────────────────────────────────────────────

/// Build the table for every grid entry in a single pass.
///
/// Instances are added one at a time. Each new instance is assessed against all earlier
/// ones, chain by chain and window by window from widest to narrowest. Once all earlier
/// instances have been tried its candidate is proven, and it is copied to every narrower
/// window that still contains the optimal path of every tied neighbour.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`NnError::InsufficientData`] | Fewer than 2 training instances |
#[instrument(skip_all, fields(n = train.len(), params = grid.len(), eap = eap))]
pub fn build_incremental(
    train: &Dataset,
    grid: &ParameterGrid,
    eap: bool,
    counters: &mut Counters,
) -> Result<CandidateTable, NnError> {
    check_size(train)?;
    let n = train.len();
    let cache = SequenceStatsCache::new(train.sequences());
    let chains = grid.chains();
    let mut table = CandidateTable::new(grid.len(), train.labels(), train.n_classes());
    let mut propagated = 0usize;

    for current in 1..n {
        let mut challengers: Vec<LazyAssessNn<'_, '_>> = (0..current)
            .map(|previous| LazyAssessNn::new(&cache, previous, current, eap))
            .collect();

        for chain in &chains {
            for (k, &p) in chain.iter().enumerate() {
                let params = grid.get(p);

                if table.get(p, current).status == Status::Nn {
                    // current is settled; it can still be the neighbour of earlier instances
                    for challenger in &mut challengers {
                        let previous = challenger.query();
                        let score = table.best_distance(p, previous);
                        if challenger.try_to_beat(score, params, counters) == Outcome::NewBest {
                            let (d, r) = (challenger.distance(), challenger.min_window_validity());
                            table.offer(p, previous, current, d, r);
                        }
                    }
                    continue;
                }

                for challenger in &mut challengers {
                    challenger.prepare(params, counters);
                }
                challengers.sort_by(|a, b| a.ranking().total_cmp(&b.ranking()));

                for challenger in &mut challengers {
                    let previous = challenger.query();
                    let score = table
                        .best_distance(p, current)
                        .max(table.best_distance(p, previous));
                    if challenger.try_to_beat(score, params, counters) == Outcome::NewBest {
                        let (d, r) = (challenger.distance(), challenger.min_window_validity());
                        table.offer(p, current, previous, d, r);
                        table.offer(p, previous, current, d, r);
                    }
                }

                table.mark_nn(p, current);
                let r = table.get(p, current).r;
                for &narrower in &chain[k + 1..] {
                    if grid.get(narrower).effective_window().half_width() < r {
                        break;
                    }
                    table.copy_candidate(p, narrower, current);
                    propagated += 1;
                }
            }
        }
    }

    debug!(
        propagated,
        distance_calls = counters.distance_calls,
        lower_bound_prunes = counters.lower_bound_prunes,
        "incremental table complete"
    );
    Ok(table)
}

// ── per parameter ────────────────────────────────────────────────────────────

/// Build the table one grid entry at a time, with no sharing between entries.
///
/// With `eap` on, each pair is computed with a cutoff equal to the larger of the two
/// instances' current best distances; otherwise every pair is computed in full.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`NnError::InsufficientData`] | Fewer than 2 training instances |
#[instrument(skip_all, fields(n = train.len(), params = grid.len(), eap = eap))]
pub fn build_per_parameter(
    train: &Dataset,
    grid: &ParameterGrid,
    eap: bool,
    counters: &mut Counters,
) -> Result<CandidateTable, NnError> {
    check_size(train)?;
    let n = train.len();
    let mut table = CandidateTable::new(grid.len(), train.labels(), train.n_classes());

    for (p, params) in grid.params().iter().enumerate() {
        for j in 1..n {
            let b = train.get(j).as_view();
            for i in 0..j {
                let a = train.get(i).as_view();
                let (d, r) = if eap {
                    let cutoff = table.best_distance(p, i).max(table.best_distance(p, j));
                    let result = params.distance_extended(a, b, cutoff);
                    counters.record_distance(result.distance, cutoff);
                    (result.distance, result.min_window_validity)
                } else {
                    let d = params.distance(a, b);
                    counters.record_distance(d, f64::INFINITY);
                    (d, 0)
                };
                table.offer(p, i, j, d, r);
                table.offer(p, j, i, d, r);
            }
        }
    }

    debug!(distance_calls = counters.distance_calls, "per-parameter table complete");
    Ok(table)
}
