//! End-to-end behaviour of one criterion's online update.

mod common;

use common::*;
use pairank_core::config::DeletionPolicy;
use pairank_core::models::{AggregationMode, RatingProperties, UserScaling};
use pairank_core::traits::{GlobalAggregator, IndividualScoreFilter, ScoreSink, ScoreSource};
use pairank_core::types::{FxHashMap, UserId};
use pairank_online::global::republish_criterion;
use pairank_online::{
    solve_individual_scores, CriterionOutcome, FanOutMode, IdentityPollScaling,
    LinearPollScaling, LocalEstimator, MeanAggregator, OnlineHeuristics, SkipReason,
    SolveOptions,
};

fn engine() -> OnlineHeuristics {
    OnlineHeuristics::default().with_fanout(FanOutMode::Sequential)
}

fn updated(outcome: CriterionOutcome) -> pairank_online::CriterionUpdate {
    match outcome {
        CriterionOutcome::Updated(update) => update,
        CriterionOutcome::Skipped(reason) => panic!("unexpected skip: {reason}"),
    }
}

#[test]
fn first_comparison_gives_opposite_equal_scores() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 10.0);

    engine()
        .run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY)
        .unwrap();

    let a = raw_score(&store, 1, ids[0], RELIABILITY).unwrap();
    let b = raw_score(&store, 1, ids[1], RELIABILITY).unwrap();
    assert!(a.raw_score < 0.0 && b.raw_score > 0.0);
    assert_eq!(a.raw_score.abs(), b.raw_score.abs());
    assert!(a.raw_uncertainty.is_finite() && a.raw_uncertainty > 0.0);
}

#[test]
fn converged_scores_are_a_fixed_point() {
    let (store, ids) = memory_store(4, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 4.0);
    compare(&store, 1, ids[1], ids[2], RELIABILITY, -3.0);
    compare(&store, 1, ids[0], ids[2], RELIABILITY, 6.0);
    compare(&store, 1, ids[2], ids[3], RELIABILITY, 2.0);

    let comparisons = store.comparisons(RELIABILITY, Some(UserId(1))).unwrap();
    let solved = solve_individual_scores(&LocalEstimator::default(), &comparisons, SolveOptions::default()).unwrap();
    assert!(solved.converged);
    for estimate in solved.scores.values() {
        store
            .upsert_individual_score(estimate.entity, UserId(1), RELIABILITY, estimate.score, estimate.uncertainty)
            .unwrap();
    }

    let engine = engine();
    for _ in 0..2 {
        engine
            .run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY)
            .unwrap();
    }

    for estimate in solved.scores.values() {
        let row = raw_score(&store, 1, estimate.entity, RELIABILITY).unwrap();
        assert!((row.raw_score - estimate.score).abs() < 1e-9);
        assert!((row.raw_uncertainty - estimate.uncertainty).abs() < 1e-9);
    }
}

#[test]
fn identical_state_gives_identical_rows() {
    let run = || {
        let (store, ids) = memory_store(3, &[RELIABILITY]);
        compare(&store, 1, ids[0], ids[1], RELIABILITY, 4.0);
        compare(&store, 1, ids[1], ids[2], RELIABILITY, -7.0);
        let engine = engine();
        engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
        engine.run_criterion(&store, &upsert_event(1, 1, 2), RELIABILITY).unwrap();
        (
            store.individual_scores(&IndividualScoreFilter::default()).unwrap(),
            store.global_scores(None, None).unwrap(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn deleting_the_only_pair_comparison_zeroes_both_entities() {
    let (store, ids) = memory_store(4, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 10.0);
    compare(&store, 1, ids[2], ids[3], RELIABILITY, 5.0);
    let engine = engine();
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    assert!(raw_score(&store, 1, ids[0], RELIABILITY).unwrap().raw_score < 0.0);

    store.delete_comparison(UserId(1), ids[0], ids[1], Some(RELIABILITY)).unwrap();
    let outcome = engine
        .run_criterion(&store, &delete_event(1, 0, 1), RELIABILITY)
        .unwrap();
    let update = updated(outcome);
    assert!(update.estimate.a.is_orphan() && update.estimate.b.is_orphan());

    for entity in [ids[0], ids[1]] {
        let row = raw_score(&store, 1, entity, RELIABILITY).unwrap();
        assert_eq!(row.raw_score, 0.0);
        assert!(row.raw_uncertainty.is_finite());
    }
}

#[test]
fn remove_policy_deletes_orphans_and_skips_global_step() {
    let (store, ids) = memory_store(4, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 10.0);
    compare(&store, 1, ids[2], ids[3], RELIABILITY, 5.0);
    let engine = engine().with_deletion_policy(DeletionPolicy::Remove);
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();

    store.delete_comparison(UserId(1), ids[0], ids[1], Some(RELIABILITY)).unwrap();
    let outcome = engine
        .run_criterion(&store, &delete_event(1, 0, 1), RELIABILITY)
        .unwrap();

    assert_eq!(outcome, CriterionOutcome::Skipped(SkipReason::EmptyJoin { entity: ids[0] }));
    assert!(raw_score(&store, 1, ids[0], RELIABILITY).is_none());
    assert!(raw_score(&store, 1, ids[1], RELIABILITY).is_none());
}

#[test]
fn reversing_a_comparison_flips_both_signs() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    let engine = engine();

    compare(&store, 1, ids[0], ids[1], RELIABILITY, 10.0);
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    let before_a = raw_score(&store, 1, ids[0], RELIABILITY).unwrap().raw_score;
    let before_b = raw_score(&store, 1, ids[1], RELIABILITY).unwrap().raw_score;

    compare(&store, 1, ids[0], ids[1], RELIABILITY, -10.0);
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    let after_a = raw_score(&store, 1, ids[0], RELIABILITY).unwrap().raw_score;
    let after_b = raw_score(&store, 1, ids[1], RELIABILITY).unwrap().raw_score;

    assert!(before_a < 0.0 && after_a > 0.0);
    assert!(before_b > 0.0 && after_b < 0.0);
}

#[test]
fn validation_skips_leave_state_untouched() {
    let (store, ids) = memory_store(3, &[RELIABILITY]);
    let engine = engine();

    let outcome = engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    assert_eq!(outcome, CriterionOutcome::Skipped(SkipReason::NoComparisons));

    compare(&store, 1, ids[0], ids[2], RELIABILITY, 3.0);
    let outcome = engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    assert_eq!(
        outcome,
        CriterionOutcome::Skipped(SkipReason::MissingComparison {
            entity_a: ids[0],
            entity_b: ids[1]
        })
    );
    assert!(store.individual_scores(&IndividualScoreFilter::default()).unwrap().is_empty());
    assert!(store.global_scores(None, None).unwrap().is_empty());
}

#[test]
fn unknown_entity_uid_is_an_error() {
    let (store, _) = memory_store(1, &[RELIABILITY]);
    let event = pairank_core::models::ComparisonEvent::upsert(POLL, UserId(1), uid(0), "yt:nope");
    let err = engine().run_criterion(&store, &event, RELIABILITY).unwrap_err();
    assert!(matches!(err, pairank_core::errors::OnlineError::UnknownEntity { uid: missing } if missing == "yt:nope"));
}

#[test]
fn scaled_table_applies_user_scaling_and_rating_flags() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 6.0);
    store
        .upsert_user_scaling(&UserScaling {
            user_id: UserId(1),
            criterion: RELIABILITY.to_string(),
            scale: 2.0,
            scale_uncertainty: 0.0,
            translation: 1.0,
            translation_uncertainty: 0.0,
        })
        .unwrap();
    store
        .upsert_rating_properties(&RatingProperties {
            user_id: UserId(1),
            entity_id: ids[0],
            is_public: true,
            is_trusted: true,
            is_supertrusted: false,
        })
        .unwrap();

    let update = updated(
        engine()
            .run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY)
            .unwrap(),
    );

    let raw_a = raw_score(&store, 1, ids[0], RELIABILITY).unwrap();
    let scaled_a = update.scaled.iter().find(|s| s.entity_id == ids[0]).unwrap();
    let scaled_b = update.scaled.iter().find(|s| s.entity_id == ids[1]).unwrap();
    assert_eq!(scaled_a.score, raw_a.raw_score * 2.0 + 1.0);
    assert!(scaled_a.is_trusted && scaled_a.is_public);
    // No rating row for b: every flag defaults to false.
    assert!(!scaled_b.is_trusted && !scaled_b.is_public);

    // Only entity a has a trusted contributor.
    let trusted = store
        .global_scores(Some(RELIABILITY), Some(AggregationMode::TrustedOnly))
        .unwrap();
    assert_eq!(trusted.len(), 1);
    assert_eq!(trusted[0].entity_id, ids[0]);
    assert_eq!(update.publication[&AggregationMode::TrustedOnly], 1);
    assert_eq!(update.publication[&AggregationMode::Default], 2);
}

#[test]
fn poll_scaling_applies_to_published_and_returned_rows() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 6.0);
    let engine = OnlineHeuristics::with_collaborators(MeanAggregator::default(), LinearPollScaling::new(3.0, 0.5))
        .with_fanout(FanOutMode::Sequential);

    let update = updated(engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap());
    let raw_a = raw_score(&store, 1, ids[0], RELIABILITY).unwrap().raw_score;

    let published = store
        .global_scores(Some(RELIABILITY), Some(AggregationMode::AllEqual))
        .unwrap();
    let published_a = published.iter().find(|r| r.entity_id == ids[0]).unwrap();
    assert!((published_a.score - (raw_a * 3.0 + 0.5)).abs() < 1e-12);

    let scaled_a = update.scaled.iter().find(|s| s.entity_id == ids[0]).unwrap();
    assert!((scaled_a.score - (raw_a * 3.0 + 0.5)).abs() < 1e-12);
}

#[test]
fn online_publication_matches_aggregator_for_touched_entities() {
    let (store, ids) = memory_store(3, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 6.0);
    compare(&store, 2, ids[0], ids[1], RELIABILITY, -2.0);
    compare(&store, 2, ids[1], ids[2], RELIABILITY, 4.0);
    let engine = engine();
    engine.run_criterion(&store, &upsert_event(2, 1, 2), RELIABILITY).unwrap();
    let untouched_before: Vec<_> = store
        .global_scores(Some(RELIABILITY), None)
        .unwrap()
        .into_iter()
        .filter(|r| r.entity_id == ids[2])
        .collect();

    let update = updated(engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap());

    for mode in AggregationMode::ALL {
        let expected = MeanAggregator::default().aggregate(&update.scaled, mode);
        let stored: Vec<_> = store
            .global_scores(Some(RELIABILITY), Some(mode))
            .unwrap()
            .into_iter()
            .filter(|r| r.entity_id != ids[2])
            .collect();
        assert_eq!(stored.len(), expected.len());
        for (row, want) in stored.iter().zip(&expected) {
            assert_eq!(row.entity_id, want.entity_id);
            assert_eq!(row.score, want.score);
            assert_eq!(row.uncertainty, want.uncertainty);
            assert_eq!(row.deviation, want.deviation);
        }
    }

    // Entity 2 keeps the rows written by the earlier event.
    let untouched_after: Vec<_> = store
        .global_scores(Some(RELIABILITY), None)
        .unwrap()
        .into_iter()
        .filter(|r| r.entity_id == ids[2])
        .collect();
    assert_eq!(untouched_before, untouched_after);
}

#[test]
fn full_republish_replaces_every_row_of_the_criterion() {
    let (store, ids) = memory_store(3, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 6.0);
    compare(&store, 1, ids[1], ids[2], RELIABILITY, 1.0);
    let engine = engine();
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    engine.run_criterion(&store, &upsert_event(1, 1, 2), RELIABILITY).unwrap();

    // Drop entity 2's individual score; a full republish must drop its global rows too.
    store.delete_individual_score(ids[2], UserId(1), RELIABILITY).unwrap();
    let publication = republish_criterion(&store, &MeanAggregator::default(), &IdentityPollScaling, POLL, RELIABILITY).unwrap();

    let rows = store.individual_scores(&IndividualScoreFilter::criterion(RELIABILITY)).unwrap();
    let scaled = pairank_online::individual::scale_individual_scores(&store, RELIABILITY, rows).unwrap();
    for mode in AggregationMode::ALL {
        let expected = MeanAggregator::default().aggregate(&scaled, mode);
        let stored = store.global_scores(Some(RELIABILITY), Some(mode)).unwrap();
        assert_eq!(stored.len(), expected.len());
        assert_eq!(publication[&mode], expected.len());
        assert!(stored.iter().all(|r| r.entity_id != ids[2]));
    }
}

#[test]
fn previous_scores_of_other_users_are_ignored() {
    let (store, ids) = memory_store(3, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 4.0);
    store.upsert_individual_score(ids[2], UserId(2), RELIABILITY, 9.0, 1.0).unwrap();
    compare(&store, 1, ids[1], ids[2], RELIABILITY, 0.0);

    engine().run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();

    let comparisons = store.comparisons(RELIABILITY, Some(UserId(1))).unwrap();
    let expected = LocalEstimator::default()
        .estimate(&comparisons, ids[0], ids[1], &FxHashMap::default())
        .unwrap();
    assert_eq!(raw_score(&store, 1, ids[1], RELIABILITY).unwrap().raw_score, expected.b.score);
}

#[test]
fn revoked_trust_drops_the_trusted_only_row() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 6.0);
    let mut rating = RatingProperties {
        user_id: UserId(1),
        entity_id: ids[0],
        is_public: true,
        is_trusted: true,
        is_supertrusted: false,
    };
    store.upsert_rating_properties(&rating).unwrap();
    let engine = engine();
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    assert_eq!(
        store
            .global_scores(Some(RELIABILITY), Some(AggregationMode::TrustedOnly))
            .unwrap()
            .len(),
        1
    );

    rating.is_trusted = false;
    store.upsert_rating_properties(&rating).unwrap();
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();

    assert!(store
        .global_scores(Some(RELIABILITY), Some(AggregationMode::TrustedOnly))
        .unwrap()
        .is_empty());
    assert_eq!(
        store
            .global_scores(Some(RELIABILITY), Some(AggregationMode::Default))
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn deleting_the_last_comparison_zeroes_both_entities() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 10.0);
    let engine = engine();
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();
    assert!(raw_score(&store, 1, ids[0], RELIABILITY).unwrap().raw_score < -0.5);

    store.delete_comparison(UserId(1), ids[0], ids[1], Some(RELIABILITY)).unwrap();
    let outcome = engine
        .run_criterion(&store, &delete_event(1, 0, 1), RELIABILITY)
        .unwrap();

    assert_eq!(outcome, CriterionOutcome::Skipped(SkipReason::NoComparisons));
    for entity in [ids[0], ids[1]] {
        let row = raw_score(&store, 1, entity, RELIABILITY).unwrap();
        assert_eq!((row.raw_score * 10.0).round() / 10.0, 0.0);
        assert!(row.raw_uncertainty.is_finite() && row.raw_uncertainty > 0.0);
    }
}

#[test]
fn deleting_the_last_comparison_removes_rows_under_remove_policy() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    compare(&store, 1, ids[0], ids[1], RELIABILITY, 10.0);
    let engine = engine().with_deletion_policy(DeletionPolicy::Remove);
    engine.run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY).unwrap();

    store.delete_comparison(UserId(1), ids[0], ids[1], Some(RELIABILITY)).unwrap();
    let outcome = engine
        .run_criterion(&store, &delete_event(1, 0, 1), RELIABILITY)
        .unwrap();

    assert_eq!(outcome, CriterionOutcome::Skipped(SkipReason::NoComparisons));
    assert!(store
        .individual_scores(&IndividualScoreFilter::criterion(RELIABILITY).with_user(UserId(1)))
        .unwrap()
        .is_empty());
}

#[test]
fn empty_upsert_never_touches_stored_scores() {
    let (store, ids) = memory_store(2, &[RELIABILITY]);
    store.upsert_individual_score(ids[0], UserId(1), RELIABILITY, 0.4, 0.2).unwrap();

    let outcome = engine()
        .run_criterion(&store, &upsert_event(1, 0, 1), RELIABILITY)
        .unwrap();

    assert_eq!(outcome, CriterionOutcome::Skipped(SkipReason::NoComparisons));
    assert_eq!(raw_score(&store, 1, ids[0], RELIABILITY).unwrap().raw_score, 0.4);
    assert!(raw_score(&store, 1, ids[1], RELIABILITY).is_none());
}
