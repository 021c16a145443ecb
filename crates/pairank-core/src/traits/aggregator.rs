//! Global aggregator port.

use crate::models::{AggregationMode, EntityAggregate, ScaledIndividualScore};

/// Combines scaled individual scores into one aggregate per entity.
///
/// Implementations must be deterministic: the same input rows in the same
/// order produce the same output.
pub trait GlobalAggregator: Send + Sync {
    fn aggregate(
        &self,
        scores: &[ScaledIndividualScore],
        mode: AggregationMode,
    ) -> Vec<EntityAggregate>;
}
