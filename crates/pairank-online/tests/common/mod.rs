//! Shared fixtures for the online integration tests.

#![allow(dead_code)]

use std::path::Path;

use pairank_core::config::StorageConfig;
use pairank_core::models::{Comparison, ComparisonEvent, IndividualRawScore};
use pairank_core::traits::{IndividualScoreFilter, ScoreSource};
use pairank_core::types::{EntityId, UserId};
use pairank_storage::{SqliteScoreStore, SqliteStoreFactory};

pub const POLL: &str = "videos";
pub const RELIABILITY: &str = "reliability";
pub const IMPORTANCE: &str = "importance";
pub const PEDAGOGY: &str = "pedagogy";

pub fn uid(i: usize) -> String {
    format!("yt:{i}")
}

/// In-memory store with `n` entities and the given criteria.
pub fn memory_store(n: usize, criteria: &[&str]) -> (SqliteScoreStore, Vec<EntityId>) {
    let store = SqliteScoreStore::open_in_memory(POLL).unwrap();
    let ids = seed(&store, n, criteria);
    (store, ids)
}

/// On-disk factory with `n` entities and the given criteria.
pub fn file_factory(dir: &Path, name: &str, n: usize, criteria: &[&str]) -> (SqliteStoreFactory, Vec<EntityId>) {
    let factory = SqliteStoreFactory::new(dir.join(name), &StorageConfig::default()).unwrap();
    let store = SqliteScoreStore::open(factory.path(), POLL).unwrap();
    let ids = seed(&store, n, criteria);
    (factory, ids)
}

fn seed(store: &SqliteScoreStore, n: usize, criteria: &[&str]) -> Vec<EntityId> {
    for (rank, criterion) in criteria.iter().enumerate() {
        store.add_poll_criterion(criterion, rank as i64).unwrap();
    }
    (0..n).map(|i| store.insert_entity(&uid(i)).unwrap()).collect()
}

pub fn compare(store: &SqliteScoreStore, user: i64, a: EntityId, b: EntityId, criterion: &str, score: f64) {
    store
        .upsert_comparison(&Comparison::new(UserId(user), a, b, criterion, score))
        .unwrap();
}

pub fn upsert_event(user: i64, a: usize, b: usize) -> ComparisonEvent {
    ComparisonEvent::upsert(POLL, UserId(user), uid(a), uid(b))
}

pub fn delete_event(user: i64, a: usize, b: usize) -> ComparisonEvent {
    ComparisonEvent::deletion(POLL, UserId(user), uid(a), uid(b))
}

pub fn raw_score<S: ScoreSource>(store: &S, user: i64, entity: EntityId, criterion: &str) -> Option<IndividualRawScore> {
    store
        .individual_scores(
            &IndividualScoreFilter::criterion(criterion)
                .with_user(UserId(user))
                .with_entity(entity),
        )
        .unwrap()
        .into_iter()
        .next()
}
