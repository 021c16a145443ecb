//! The online engine and its per-criterion pipeline.

use pairank_core::config::{DeletionPolicy, PairankConfig};
use pairank_core::constants::DEFAULT_TOTAL_SCORE_FACTOR;
use pairank_core::errors::OnlineError;
use pairank_core::models::{ComparisonEvent, ScaledIndividualScore};
use pairank_core::traits::{GlobalAggregator, PollScaling, ReplaceScope, ScoreSource, ScoreStore};
use pairank_core::types::EntityId;

use crate::aggregator::MeanAggregator;
use crate::estimator::{LocalEstimator, PairEstimate};
use crate::fanout::FanOutMode;
use crate::global::{publish_global_scores, Publication};
use crate::individual::{
    clear_orphaned_pair, refresh_individual_scores, scaled_scores_for_pair, PairScores,
};
use crate::poll_scaling::IdentityPollScaling;
use crate::validator::{validate_update, SkipReason};

/// What one criterion's pipeline did.
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionOutcome {
    Updated(CriterionUpdate),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionUpdate {
    pub estimate: PairEstimate,
    /// Global rows written per mode.
    pub publication: Publication,
    /// Scaled individual scores of both entities, after poll scaling.
    pub scaled: Vec<ScaledIndividualScore>,
}

/// Online engine with its collaborators and settings.
#[derive(Debug, Clone)]
pub struct OnlineHeuristics<A = MeanAggregator, P = IdentityPollScaling> {
    estimator: LocalEstimator,
    aggregator: A,
    poll_scaling: P,
    deletion_policy: DeletionPolicy,
    total_score_factor: f64,
    fanout: FanOutMode,
}

impl Default for OnlineHeuristics {
    fn default() -> Self {
        Self::with_collaborators(MeanAggregator::default(), IdentityPollScaling)
    }
}

impl<A: GlobalAggregator, P: PollScaling> OnlineHeuristics<A, P> {
    /// Default settings around the given collaborators.
    pub fn with_collaborators(aggregator: A, poll_scaling: P) -> Self {
        Self {
            estimator: LocalEstimator::default(),
            aggregator,
            poll_scaling,
            deletion_policy: DeletionPolicy::default(),
            total_score_factor: DEFAULT_TOTAL_SCORE_FACTOR,
            fanout: FanOutMode::default(),
        }
    }

    pub fn from_config(config: &PairankConfig, aggregator: A, poll_scaling: P) -> Self {
        Self {
            estimator: LocalEstimator::from_config(&config.estimator),
            aggregator,
            poll_scaling,
            deletion_policy: config.scores.effective_deletion_policy(),
            total_score_factor: config.scores.effective_total_score_factor(),
            fanout: FanOutMode::from_config(&config.fanout),
        }
    }

    pub fn with_estimator(mut self, estimator: LocalEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    pub fn with_total_score_factor(mut self, factor: f64) -> Self {
        self.total_score_factor = factor;
        self
    }

    pub fn with_fanout(mut self, fanout: FanOutMode) -> Self {
        self.fanout = fanout;
        self
    }

    pub fn estimator(&self) -> &LocalEstimator {
        &self.estimator
    }

    pub fn deletion_policy(&self) -> DeletionPolicy {
        self.deletion_policy
    }

    pub fn total_score_factor(&self) -> f64 {
        self.total_score_factor
    }

    pub fn fanout(&self) -> FanOutMode {
        self.fanout
    }

    /// Validate, estimate, persist, and republish one criterion.
    ///
    /// Skips are returned as [`CriterionOutcome::Skipped`]; only storage,
    /// estimation, and lookup failures are errors.
    pub fn run_criterion<S: ScoreStore + ?Sized>(
        &self,
        store: &S,
        event: &ComparisonEvent,
        criterion: &str,
    ) -> Result<CriterionOutcome, OnlineError> {
        let entity_a = resolve_entity(store, &event.entity_a_uid)?;
        let entity_b = resolve_entity(store, &event.entity_b_uid)?;

        let comparisons = store.comparisons(criterion, Some(event.user_id))?;
        if let Err(reason) = validate_update(&comparisons, entity_a, entity_b, event.is_delete) {
            if event.is_delete && reason == SkipReason::NoComparisons {
                clear_orphaned_pair(
                    store,
                    &self.estimator,
                    self.deletion_policy,
                    criterion,
                    event.user_id,
                    entity_a,
                    entity_b,
                )?;
            }
            tracing::warn!(
                poll = %event.poll,
                criterion,
                user_id = %event.user_id,
                %reason,
                "skipping online update"
            );
            return Ok(CriterionOutcome::Skipped(reason));
        }

        let estimate = refresh_individual_scores(
            store,
            &self.estimator,
            self.deletion_policy,
            criterion,
            event.user_id,
            &comparisons,
            entity_a,
            entity_b,
        )?;

        let mut scaled = match scaled_scores_for_pair(store, criterion, entity_a, entity_b)? {
            PairScores::Scaled(rows) => rows,
            PairScores::Missing(entity) => {
                let reason = SkipReason::EmptyJoin { entity };
                tracing::warn!(
                    poll = %event.poll,
                    criterion,
                    %reason,
                    "skipping global update"
                );
                return Ok(CriterionOutcome::Skipped(reason));
            }
        };

        let publication = publish_global_scores(
            store,
            &self.aggregator,
            &self.poll_scaling,
            &event.poll,
            criterion,
            &mut scaled,
            ReplaceScope::Entities(&[entity_a, entity_b]),
        )?;

        tracing::debug!(
            poll = %event.poll,
            criterion,
            entity_a = %entity_a,
            score_a = estimate.a.score,
            entity_b = %entity_b,
            score_b = estimate.b.score,
            "criterion updated"
        );

        Ok(CriterionOutcome::Updated(CriterionUpdate {
            estimate,
            publication,
            scaled,
        }))
    }
}

fn resolve_entity<S: ScoreSource + ?Sized>(store: &S, uid: &str) -> Result<EntityId, OnlineError> {
    store
        .entity_id(uid)?
        .ok_or_else(|| OnlineError::UnknownEntity {
            uid: uid.to_string(),
        })
}
