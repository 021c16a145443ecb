//! Reference full re-solve of one contributor's scores.
//!
//! Solves the fixed point the online step approximates,
//! `Kaa(e) theta(e) - sum_x k(e,x) theta(x) = L(e)` for every entity, by
//! Gauss-Seidel sweeps. The system is strictly diagonally dominant thanks
//! to `alpha`, so sweeps converge. Never used on the online path.

use pairank_core::constants::{DEFAULT_MAX_SWEEPS, DEFAULT_SOLVE_TOLERANCE};
use pairank_core::errors::EstimationError;
use pairank_core::models::Comparison;
use pairank_core::types::{BTreeMap, EntityId, FxHashMap};

use crate::estimator::{ComparisonGraph, EntityEstimate, LocalEstimator};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    pub max_sweeps: usize,
    /// Stop once no score moves by more than this in one sweep.
    pub tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_sweeps: DEFAULT_MAX_SWEEPS,
            tolerance: DEFAULT_SOLVE_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub scores: BTreeMap<EntityId, EntityEstimate>,
    pub sweeps: usize,
    pub converged: bool,
}

impl SolveReport {
    /// Raw scores only, in the shape the online estimator takes as `previous`.
    pub fn raw_scores(&self) -> FxHashMap<EntityId, f64> {
        self.scores.iter().map(|(e, est)| (*e, est.score)).collect()
    }
}

/// Solve every entity's raw score and uncertainty from `comparisons`.
pub fn solve_individual_scores(
    estimator: &LocalEstimator,
    comparisons: &[Comparison],
    options: SolveOptions,
) -> Result<SolveReport, EstimationError> {
    let graph = ComparisonGraph::build(comparisons, estimator.r_max());
    if graph.pairs == 0 {
        return Err(EstimationError::NoComparisons);
    }

    let entities: Vec<EntityId> = graph.entities().collect();
    let mut theta: FxHashMap<EntityId, f64> = entities.iter().map(|e| (*e, 0.0)).collect();

    let mut sweeps = 0;
    let mut converged = false;
    while sweeps < options.max_sweeps {
        sweeps += 1;
        let mut max_change: f64 = 0.0;
        for &e in &entities {
            let next = graph.newton_step(e, estimator.alpha(), &theta);
            let prev = theta.insert(e, next).unwrap_or(0.0);
            max_change = max_change.max((next - prev).abs());
        }
        if max_change <= options.tolerance {
            converged = true;
            break;
        }
    }
    if !converged {
        tracing::warn!(sweeps, "full re-solve hit the sweep cap before converging");
    }

    let sigma = graph.residual_variance(&theta).sqrt();
    let mut scores = BTreeMap::new();
    for &e in &entities {
        let score = theta.get(&e).copied().unwrap_or(0.0);
        let uncertainty = sigma / graph.curvature(e, estimator.alpha()).sqrt();
        if !score.is_finite() || !uncertainty.is_finite() {
            return Err(EstimationError::NonFinite { entity: e });
        }
        scores.insert(
            e,
            EntityEstimate {
                entity: e,
                score,
                uncertainty,
                neighbours: graph.neighbour_count(e),
            },
        );
    }

    Ok(SolveReport {
        scores,
        sweeps,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairank_core::types::UserId;

    fn cmp(a: i64, b: i64, score: f64) -> Comparison {
        Comparison::new(UserId(1), EntityId(a), EntityId(b), "reliability", score)
    }

    #[test]
    fn single_pair_solution_is_antisymmetric() {
        let report = solve_individual_scores(
            &LocalEstimator::default(),
            &[cmp(1, 2, 6.0)],
            SolveOptions::default(),
        )
        .unwrap();
        assert!(report.converged);
        let a = report.scores[&EntityId(1)].score;
        let b = report.scores[&EntityId(2)].score;
        assert!(a < 0.0 && b > 0.0);
        assert!((a + b).abs() < 1e-9);
    }

    #[test]
    fn chain_orders_entities_by_preference() {
        // 1 preferred to 2, 2 preferred to 3.
        let report = solve_individual_scores(
            &LocalEstimator::default(),
            &[cmp(1, 2, 5.0), cmp(2, 3, 5.0)],
            SolveOptions::default(),
        )
        .unwrap();
        let s = |e| report.scores[&EntityId(e)].score;
        assert!(s(1) < s(2) && s(2) < s(3));
    }

    #[test]
    fn sweep_cap_is_reported() {
        let report = solve_individual_scores(
            &LocalEstimator::default(),
            &[cmp(1, 2, 5.0), cmp(2, 3, 5.0)],
            SolveOptions {
                max_sweeps: 1,
                tolerance: 0.0,
            },
        )
        .unwrap();
        assert_eq!(report.sweeps, 1);
        assert!(!report.converged);
    }
}
