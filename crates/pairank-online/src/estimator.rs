//! Local estimator: a frozen-neighbour Newton step for the two entities of
//! a changed comparison.
//!
//! The robust preference model gives every comparison between `e` and `x` a
//! normalised score `r = score / (1 + r_max)`, a gradient term
//! `l = -r / sqrt(1 - r^2)` and a weight `k = (1 - r^2)^3`. Near-saturated
//! votes get vanishing weight. For an entity `e`:
//!
//! ```text
//! L(e)   = sum_x k(e,x) * l(e,x)
//! Kaa(e) = sum_x k(e,x) + alpha
//! theta(e) = (L(e) + sum_x k(e,x) * previous(x)) / Kaa(e)
//! ```
//!
//! Only the two target entities are moved. Every neighbour keeps its last
//! known score, so one step approximates (and, when repeated, converges to)
//! the full re-solve in [`crate::solve`].

use pairank_core::config::EstimatorConfig;
use pairank_core::constants::{DEFAULT_ALPHA, DEFAULT_R_MAX};
use pairank_core::errors::EstimationError;
use pairank_core::models::Comparison;
use pairank_core::types::{BTreeMap, EntityId, FxHashMap};

/// Refreshed raw score of one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityEstimate {
    pub entity: EntityId,
    pub score: f64,
    pub uncertainty: f64,
    /// Number of distinct entities this one is compared with.
    pub neighbours: usize,
}

impl EntityEstimate {
    /// True if the entity no longer appears in any comparison.
    pub fn is_orphan(&self) -> bool {
        self.neighbours == 0
    }
}

/// Result of one estimation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairEstimate {
    pub a: EntityEstimate,
    pub b: EntityEstimate,
}

/// Closed-form estimator with explicit model constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalEstimator {
    r_max: f64,
    alpha: f64,
}

impl Default for LocalEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_R_MAX, DEFAULT_ALPHA)
    }
}

impl LocalEstimator {
    pub fn new(r_max: f64, alpha: f64) -> Self {
        Self { r_max, alpha }
    }

    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self::new(config.effective_r_max(), config.effective_alpha())
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Recompute `a` and `b` from one contributor's comparisons on one
    /// criterion. Entities missing from `previous` count as 0.
    ///
    /// Both targets read neighbours from the same snapshot: `b`'s new score
    /// never feeds into `a`'s in this pass.
    pub fn estimate(
        &self,
        comparisons: &[Comparison],
        a: EntityId,
        b: EntityId,
        previous: &FxHashMap<EntityId, f64>,
    ) -> Result<PairEstimate, EstimationError> {
        let graph = ComparisonGraph::build(comparisons, self.r_max);
        if graph.pairs == 0 {
            return Err(EstimationError::NoComparisons);
        }

        let theta_a = graph.newton_step(a, self.alpha, previous);
        let theta_b = graph.newton_step(b, self.alpha, previous);

        let mut scores = previous.clone();
        scores.insert(a, theta_a);
        scores.insert(b, theta_b);
        let sigma = graph.residual_variance(&scores).sqrt();

        let estimate_a = self.finish(&graph, a, theta_a, sigma)?;
        let estimate_b = self.finish(&graph, b, theta_b, sigma)?;
        Ok(PairEstimate {
            a: estimate_a,
            b: estimate_b,
        })
    }

    /// Estimate of an entity the contributor no longer compares at all:
    /// score 0, with a unit residual spread over the ridge term alone.
    pub fn orphan(&self, entity: EntityId) -> EntityEstimate {
        EntityEstimate {
            entity,
            score: 0.0,
            uncertainty: 1.0 / self.alpha.sqrt(),
            neighbours: 0,
        }
    }

    fn finish(
        &self,
        graph: &ComparisonGraph,
        entity: EntityId,
        score: f64,
        sigma: f64,
    ) -> Result<EntityEstimate, EstimationError> {
        let uncertainty = sigma / graph.curvature(entity, self.alpha).sqrt();
        if !score.is_finite() || !uncertainty.is_finite() {
            return Err(EstimationError::NonFinite { entity });
        }
        Ok(EntityEstimate {
            entity,
            score,
            uncertainty,
            neighbours: graph.neighbour_count(entity),
        })
    }
}

/// One directed edge of the symmetrised comparison table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge {
    pub(crate) k: f64,
    pub(crate) l: f64,
}

impl Edge {
    fn from_normalised(r: f64) -> Self {
        let one_minus_r2 = 1.0 - r * r;
        Self {
            k: one_minus_r2.powi(3),
            l: -r / one_minus_r2.sqrt(),
        }
    }

    /// `k * l`, or 0 when the product is not a number.
    fn weighted_gradient(self) -> f64 {
        let kl = self.k * self.l;
        if kl.is_finite() {
            kl
        } else {
            0.0
        }
    }

    /// `k`, or 0 when undefined.
    fn coupling(self) -> f64 {
        if self.k.is_finite() {
            self.k
        } else {
            0.0
        }
    }
}

/// Symmetrised comparisons of one contributor, keyed in id order so every
/// sum runs in the same order whatever order the rows were read in.
pub(crate) struct ComparisonGraph {
    edges: BTreeMap<EntityId, BTreeMap<EntityId, Edge>>,
    /// Distinct unordered pairs.
    pub(crate) pairs: usize,
}

impl ComparisonGraph {
    /// Builds the table. A later row for the same pair (in either direction)
    /// replaces an earlier one. Self-comparisons are ignored and scores are
    /// clamped to `[-r_max, r_max]`.
    pub(crate) fn build(comparisons: &[Comparison], r_max: f64) -> Self {
        let mut edges: BTreeMap<EntityId, BTreeMap<EntityId, Edge>> = BTreeMap::new();
        for c in comparisons {
            if c.entity_a == c.entity_b {
                continue;
            }
            // Not clamp: it panics on a NaN or negative r_max.
            let r = c.score.max(-r_max).min(r_max) / (1.0 + r_max);
            edges
                .entry(c.entity_a)
                .or_default()
                .insert(c.entity_b, Edge::from_normalised(r));
            edges
                .entry(c.entity_b)
                .or_default()
                .insert(c.entity_a, Edge::from_normalised(-r));
        }
        let pairs = edges.values().map(BTreeMap::len).sum::<usize>() / 2;
        Self { edges, pairs }
    }

    pub(crate) fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.edges.keys().copied()
    }

    pub(crate) fn neighbour_count(&self, entity: EntityId) -> usize {
        self.edges.get(&entity).map_or(0, BTreeMap::len)
    }

    fn neighbours(&self, entity: EntityId) -> impl Iterator<Item = (EntityId, Edge)> + '_ {
        self.edges
            .get(&entity)
            .into_iter()
            .flat_map(|row| row.iter().map(|(x, edge)| (*x, *edge)))
    }

    /// `Kaa(e)`: total weight plus the ridge term.
    pub(crate) fn curvature(&self, entity: EntityId, alpha: f64) -> f64 {
        self.neighbours(entity).map(|(_, e)| e.coupling()).sum::<f64>() + alpha
    }

    /// `theta(e)` with every neighbour frozen at its `scores` value.
    pub(crate) fn newton_step(
        &self,
        entity: EntityId,
        alpha: f64,
        scores: &FxHashMap<EntityId, f64>,
    ) -> f64 {
        let mut gradient = 0.0;
        let mut coupled = 0.0;
        for (x, edge) in self.neighbours(entity) {
            gradient += edge.weighted_gradient();
            coupled += edge.coupling() * scores.get(&x).copied().unwrap_or(0.0);
        }
        let kaa = self.curvature(entity, alpha);
        gradient / kaa + coupled / kaa
    }

    /// `sigma^2 = (1 + 1/2 sum k (l - (theta_e - theta_x))^2) / pairs`, the sum
    /// running over both directions of every pair. Unknown scores count as 0.
    pub(crate) fn residual_variance(&self, scores: &FxHashMap<EntityId, f64>) -> f64 {
        let theta = |e: &EntityId| scores.get(e).copied().unwrap_or(0.0);
        let mut weighted_residuals = 0.0;
        for (e, row) in &self.edges {
            for (x, edge) in row {
                let residual = edge.l - (theta(e) - theta(x));
                let term = edge.k * residual * residual;
                if term.is_finite() {
                    weighted_residuals += term;
                }
            }
        }
        (1.0 + weighted_residuals / 2.0) / self.pairs as f64
    }
}
