//! Individual-update orchestration: estimate, persist, then rebuild the
//! scaled individual scores of the two touched entities.

use pairank_core::config::DeletionPolicy;
use pairank_core::errors::{OnlineError, StorageError};
use pairank_core::models::{
    Comparison, IndividualRawScore, RatingProperties, ScaledIndividualScore, UserScaling,
};
use pairank_core::traits::{IndividualScoreFilter, ScoreSink, ScoreSource, ScoreStore};
use pairank_core::types::{EntityId, FxHashMap, UserId};

use crate::estimator::{LocalEstimator, PairEstimate};

/// Scaled scores of a touched entity pair.
#[derive(Debug, Clone, PartialEq)]
pub enum PairScores {
    /// Every contributor's scaled score on either entity, entity `a` first.
    Scaled(Vec<ScaledIndividualScore>),
    /// This entity has no individual score at all.
    Missing(EntityId),
}

/// Estimate `a` and `b` for `user` and persist the result.
///
/// An orphaned target (no comparisons left) is stored at its estimate of
/// exactly 0 under [`DeletionPolicy::Zero`] and deleted under
/// [`DeletionPolicy::Remove`].
#[allow(clippy::too_many_arguments)]
pub fn refresh_individual_scores<S: ScoreStore + ?Sized>(
    store: &S,
    estimator: &LocalEstimator,
    policy: DeletionPolicy,
    criterion: &str,
    user: UserId,
    comparisons: &[Comparison],
    entity_a: EntityId,
    entity_b: EntityId,
) -> Result<PairEstimate, OnlineError> {
    let previous: FxHashMap<EntityId, f64> = store
        .individual_scores(&IndividualScoreFilter::criterion(criterion).with_user(user))?
        .into_iter()
        .map(|row| (row.entity_id, row.raw_score))
        .collect();

    let estimate = estimator.estimate(comparisons, entity_a, entity_b, &previous)?;
    persist_estimate(store, policy, criterion, user, &estimate)?;
    Ok(estimate)
}

/// Apply `policy` to both targets of a deletion that removed the
/// contributor's last comparison on `criterion`. There is nothing left to
/// estimate from, so both entities are orphans.
pub fn clear_orphaned_pair<S: ScoreSink + ?Sized>(
    store: &S,
    estimator: &LocalEstimator,
    policy: DeletionPolicy,
    criterion: &str,
    user: UserId,
    entity_a: EntityId,
    entity_b: EntityId,
) -> Result<PairEstimate, OnlineError> {
    let estimate = PairEstimate {
        a: estimator.orphan(entity_a),
        b: estimator.orphan(entity_b),
    };
    persist_estimate(store, policy, criterion, user, &estimate)?;
    Ok(estimate)
}

fn persist_estimate<S: ScoreSink + ?Sized>(
    store: &S,
    policy: DeletionPolicy,
    criterion: &str,
    user: UserId,
    estimate: &PairEstimate,
) -> Result<(), StorageError> {
    for entity in [estimate.a, estimate.b] {
        if entity.is_orphan() && policy == DeletionPolicy::Remove {
            let removed = store.delete_individual_score(entity.entity, user, criterion)?;
            tracing::debug!(criterion, entity = %entity.entity, removed, "removed orphaned individual score");
            continue;
        }
        store.upsert_individual_score(
            entity.entity,
            user,
            criterion,
            entity.score,
            entity.uncertainty,
        )?;
    }
    Ok(())
}

/// Load every contributor's individual score on `a` and `b` and scale it.
pub fn scaled_scores_for_pair<S: ScoreSource + ?Sized>(
    store: &S,
    criterion: &str,
    entity_a: EntityId,
    entity_b: EntityId,
) -> Result<PairScores, StorageError> {
    let rows_a = store.individual_scores(&IndividualScoreFilter::criterion(criterion).with_entity(entity_a))?;
    if rows_a.is_empty() {
        return Ok(PairScores::Missing(entity_a));
    }
    let mut rows = rows_a;
    if entity_b != entity_a {
        let rows_b = store.individual_scores(&IndividualScoreFilter::criterion(criterion).with_entity(entity_b))?;
        if rows_b.is_empty() {
            return Ok(PairScores::Missing(entity_b));
        }
        rows.extend(rows_b);
    }
    Ok(PairScores::Scaled(scale_individual_scores(store, criterion, rows)?))
}

/// Join raw scores of one criterion with their contributor's scaling
/// (identity when none is stored) and rating flags (all false when absent).
pub fn scale_individual_scores<S: ScoreSource + ?Sized>(
    store: &S,
    criterion: &str,
    rows: Vec<IndividualRawScore>,
) -> Result<Vec<ScaledIndividualScore>, StorageError> {
    let scalings: FxHashMap<UserId, UserScaling> = store
        .user_scalings(None)?
        .into_iter()
        .filter(|s| s.criterion == criterion)
        .map(|s| (s.user_id, s))
        .collect();
    let ratings: FxHashMap<(UserId, EntityId), RatingProperties> = store
        .ratings_properties()?
        .into_iter()
        .map(|r| ((r.user_id, r.entity_id), r))
        .collect();

    Ok(rows
        .iter()
        .map(|raw| {
            let scaling = scalings
                .get(&raw.user_id)
                .cloned()
                .unwrap_or_else(|| UserScaling::identity(raw.user_id, criterion));
            let properties = ratings
                .get(&(raw.user_id, raw.entity_id))
                .copied()
                .unwrap_or_else(|| RatingProperties::absent(raw.user_id, raw.entity_id));
            ScaledIndividualScore::from_parts(raw, &scaling, &properties)
        })
        .collect())
}
