//! Reference global aggregator.

use pairank_core::models::{AggregationMode, EntityAggregate, ScaledIndividualScore};
use pairank_core::traits::GlobalAggregator;
use pairank_core::types::{BTreeMap, EntityId};

/// Default floor added to squared uncertainties before inverting them.
pub const DEFAULT_PRECISION_EPSILON: f64 = 1e-6;

/// Weighted mean of scaled individual scores, per entity.
///
/// - `Default`: every contributor, weight `1 / (uncertainty^2 + epsilon)`.
/// - `AllEqual`: every contributor, weight 1.
/// - `TrustedOnly`: trusted contributors only, precision weights.
///
/// Uncertainty is `1 / sqrt(sum w)` for precision weights and
/// `sqrt(sum u^2) / n` for equal weights. Deviation is the weighted standard
/// deviation. Entities without an admitted contributor produce no row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanAggregator {
    epsilon: f64,
}

impl Default for MeanAggregator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_PRECISION_EPSILON,
        }
    }
}

impl MeanAggregator {
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    fn admits(mode: AggregationMode, score: &ScaledIndividualScore) -> bool {
        match mode {
            AggregationMode::Default | AggregationMode::AllEqual => true,
            AggregationMode::TrustedOnly => score.is_trusted,
        }
    }

    fn weight(&self, mode: AggregationMode, score: &ScaledIndividualScore) -> f64 {
        match mode {
            AggregationMode::AllEqual => 1.0,
            AggregationMode::Default | AggregationMode::TrustedOnly => {
                1.0 / (score.uncertainty * score.uncertainty + self.epsilon)
            }
        }
    }

    fn combine(&self, mode: AggregationMode, entity_id: EntityId, group: &[&ScaledIndividualScore]) -> EntityAggregate {
        let weights: Vec<f64> = group.iter().map(|s| self.weight(mode, s)).collect();
        let total: f64 = weights.iter().sum();
        let mean = group
            .iter()
            .zip(&weights)
            .map(|(s, w)| w * s.score)
            .sum::<f64>()
            / total;
        let variance = group
            .iter()
            .zip(&weights)
            .map(|(s, w)| w * (s.score - mean).powi(2))
            .sum::<f64>()
            / total;
        let uncertainty = match mode {
            AggregationMode::AllEqual => {
                group.iter().map(|s| s.uncertainty.powi(2)).sum::<f64>().sqrt() / group.len() as f64
            }
            AggregationMode::Default | AggregationMode::TrustedOnly => 1.0 / total.sqrt(),
        };
        EntityAggregate {
            entity_id,
            score: mean,
            uncertainty,
            deviation: variance.sqrt(),
        }
    }
}

impl GlobalAggregator for MeanAggregator {
    fn aggregate(
        &self,
        scores: &[ScaledIndividualScore],
        mode: AggregationMode,
    ) -> Vec<EntityAggregate> {
        let mut groups: BTreeMap<EntityId, Vec<&ScaledIndividualScore>> = BTreeMap::new();
        for score in scores.iter().filter(|s| Self::admits(mode, s)) {
            groups.entry(score.entity_id).or_default().push(score);
        }
        groups
            .into_iter()
            .map(|(entity_id, group)| self.combine(mode, entity_id, &group))
            .collect()
    }
}
