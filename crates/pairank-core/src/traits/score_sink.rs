//! Write side of the storage port.

use crate::errors::StorageError;
use crate::models::{AggregationMode, GlobalEntityScore};
use crate::types::{EntityId, UserId};

/// Which stored rows of one (criterion, mode) a global replace deletes
/// before inserting the new set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceScope<'a> {
    /// Every row of the (criterion, mode). After the call the stored set
    /// equals the given rows exactly.
    Criterion,
    /// Rows of these entities only. After the call their rows equal the
    /// given rows, even when the aggregator returned nothing for one of them.
    Entities(&'a [EntityId]),
}

/// Mutations the online engine applies to one poll.
///
/// Each call is one atomic unit: on error no partial row set is visible.
pub trait ScoreSink {
    /// Update the (user, entity, criterion) row in place, or insert it.
    fn upsert_individual_score(
        &self,
        entity: EntityId,
        user: UserId,
        criterion: &str,
        raw_score: f64,
        raw_uncertainty: f64,
    ) -> Result<(), StorageError>;

    /// Returns true if a row was deleted.
    fn delete_individual_score(
        &self,
        entity: EntityId,
        user: UserId,
        criterion: &str,
    ) -> Result<bool, StorageError>;

    /// Delete then bulk-insert the global scores of (criterion, mode).
    fn replace_global_scores(
        &self,
        rows: &[GlobalEntityScore],
        criterion: &str,
        mode: AggregationMode,
        scope: ReplaceScope<'_>,
    ) -> Result<(), StorageError>;

    /// Recompute every entity's total as `total_score_factor` times the sum
    /// of its default-mode criterion scores. Returns the number of totals written.
    fn finalize_published_scores(&self, total_score_factor: f64) -> Result<usize, StorageError>;
}
