//! Update validator: decides whether an event has enough data to estimate.

use std::fmt;

use pairank_core::models::Comparison;
use pairank_core::types::EntityId;

/// Why one criterion's refresh was skipped. Skips are logged, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The contributor has no comparisons on the criterion.
    NoComparisons,
    /// No comparison between the two targets, and the event is not a deletion.
    MissingComparison { entity_a: EntityId, entity_b: EntityId },
    /// An entity had no individual scores left to aggregate.
    EmptyJoin { entity: EntityId },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoComparisons => write!(f, "no comparisons for the criterion"),
            Self::MissingComparison { entity_a, entity_b } => {
                write!(f, "no comparison between {entity_a} and {entity_b}")
            }
            Self::EmptyJoin { entity } => write!(f, "no individual score for entity {entity}"),
        }
    }
}

/// Check the state an event will be estimated from.
///
/// A deletion may proceed without a matching comparison: the row is already
/// gone by the time the refresh runs, and the estimator prices its absence in.
pub fn validate_update(
    comparisons: &[Comparison],
    entity_a: EntityId,
    entity_b: EntityId,
    is_delete: bool,
) -> Result<(), SkipReason> {
    if comparisons.is_empty() {
        return Err(SkipReason::NoComparisons);
    }
    if !is_delete && !comparisons.iter().any(|c| c.is_between(entity_a, entity_b)) {
        return Err(SkipReason::MissingComparison { entity_a, entity_b });
    }
    Ok(())
}
