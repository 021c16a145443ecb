//! Poll-scoped SQLite store implementing the engine's storage ports.

use std::path::{Path, PathBuf};

use pairank_core::config::StorageConfig;
use pairank_core::errors::StorageError;
use pairank_core::models::{
    AggregationMode, Comparison, GlobalEntityScore, IndividualRawScore, RatingProperties,
    UserScaling,
};
use pairank_core::traits::{
    IndividualScoreFilter, ReplaceScope, ScoreSink, ScoreSource, StoreFactory,
};
use pairank_core::types::{EntityId, UserId};

use crate::connection::DatabaseManager;
use crate::queries::{
    comparisons, criteria, entities, entity_scores, individual_scores, ratings, total_scores,
    user_scalings,
};

/// One connection bound to one poll.
pub struct SqliteScoreStore {
    db: DatabaseManager,
    poll: String,
}

impl SqliteScoreStore {
    pub fn new(db: DatabaseManager, poll: impl Into<String>) -> Self {
        Self {
            db,
            poll: poll.into(),
        }
    }

    pub fn open(path: &Path, poll: impl Into<String>) -> Result<Self, StorageError> {
        Ok(Self::new(DatabaseManager::open(path)?, poll))
    }

    /// In-memory store (for testing). Not shareable with other connections.
    pub fn open_in_memory(poll: impl Into<String>) -> Result<Self, StorageError> {
        Ok(Self::new(DatabaseManager::open_in_memory()?, poll))
    }

    pub fn poll(&self) -> &str {
        &self.poll
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    // ---- Seeding writers used by trigger surfaces and tests ----

    /// Entities are shared by every poll.
    pub fn insert_entity(&self, uid: &str) -> Result<EntityId, StorageError> {
        self.db.with_conn(|conn| entities::insert_entity(conn, uid))
    }

    pub fn add_poll_criterion(&self, criterion: &str, rank: i64) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| criteria::add_poll_criterion(conn, &self.poll, criterion, rank))
    }

    pub fn upsert_comparison(&self, comparison: &Comparison) -> Result<(), StorageError> {
        self.db.with_immediate_transaction(|tx| {
            comparisons::upsert_comparison(tx, &self.poll, comparison)
        })
    }

    /// Delete the comparison between `a` and `b` on `criterion` (or on every
    /// criterion with `None`). Returns the number of rows deleted.
    pub fn delete_comparison(
        &self,
        user: UserId,
        a: EntityId,
        b: EntityId,
        criterion: Option<&str>,
    ) -> Result<usize, StorageError> {
        self.db.with_immediate_transaction(|tx| {
            comparisons::delete_comparison(tx, &self.poll, user, a, b, criterion)
        })
    }

    pub fn upsert_rating_properties(&self, rating: &RatingProperties) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| ratings::upsert_rating_properties(conn, &self.poll, rating))
    }

    pub fn upsert_user_scaling(&self, scaling: &UserScaling) -> Result<(), StorageError> {
        self.db
            .with_conn(|conn| user_scalings::upsert_user_scaling(conn, &self.poll, scaling))
    }

    // ---- Published state readers ----

    pub fn global_scores(
        &self,
        criterion: Option<&str>,
        mode: Option<AggregationMode>,
    ) -> Result<Vec<GlobalEntityScore>, StorageError> {
        self.db.with_conn(|conn| {
            entity_scores::query_entity_criteria_scores(conn, &self.poll, criterion, mode)
        })
    }

    pub fn total_scores(&self) -> Result<Vec<total_scores::TotalScoreRow>, StorageError> {
        self.db
            .with_conn(|conn| total_scores::query_total_scores(conn, &self.poll))
    }
}

impl ScoreSource for SqliteScoreStore {
    fn comparisons(
        &self,
        criterion: &str,
        user: Option<UserId>,
    ) -> Result<Vec<Comparison>, StorageError> {
        self.db
            .with_conn(|conn| comparisons::query_comparisons(conn, &self.poll, criterion, user))
    }

    fn ratings_properties(&self) -> Result<Vec<RatingProperties>, StorageError> {
        self.db
            .with_conn(|conn| ratings::query_ratings_properties(conn, &self.poll))
    }

    fn user_scalings(&self, user: Option<UserId>) -> Result<Vec<UserScaling>, StorageError> {
        self.db
            .with_conn(|conn| user_scalings::query_user_scalings(conn, &self.poll, user))
    }

    fn individual_scores(
        &self,
        filter: &IndividualScoreFilter,
    ) -> Result<Vec<IndividualRawScore>, StorageError> {
        self.db.with_conn(|conn| {
            individual_scores::query_individual_scores(conn, &self.poll, filter)
        })
    }

    fn entity_id(&self, uid: &str) -> Result<Option<EntityId>, StorageError> {
        self.db.with_conn(|conn| entities::entity_id_by_uid(conn, uid))
    }

    fn poll_criteria(&self) -> Result<Vec<String>, StorageError> {
        self.db
            .with_conn(|conn| criteria::poll_criteria(conn, &self.poll))
    }
}

impl ScoreSink for SqliteScoreStore {
    fn upsert_individual_score(
        &self,
        entity: EntityId,
        user: UserId,
        criterion: &str,
        raw_score: f64,
        raw_uncertainty: f64,
    ) -> Result<(), StorageError> {
        let row = IndividualRawScore {
            user_id: user,
            entity_id: entity,
            criterion: criterion.to_string(),
            raw_score,
            raw_uncertainty,
        };
        self.db.with_immediate_transaction(|tx| {
            individual_scores::upsert_individual_score(tx, &self.poll, &row)
        })
    }

    fn delete_individual_score(
        &self,
        entity: EntityId,
        user: UserId,
        criterion: &str,
    ) -> Result<bool, StorageError> {
        self.db.with_immediate_transaction(|tx| {
            individual_scores::delete_individual_score(tx, &self.poll, user, entity, criterion)
        })
    }

    fn replace_global_scores(
        &self,
        rows: &[GlobalEntityScore],
        criterion: &str,
        mode: AggregationMode,
        scope: ReplaceScope<'_>,
    ) -> Result<(), StorageError> {
        let written = self.db.with_immediate_transaction(|tx| {
            entity_scores::replace_entity_criteria_scores(tx, &self.poll, criterion, mode, scope, rows)
        })?;
        tracing::debug!(poll = %self.poll, criterion, mode = %mode, rows = written, "replaced global scores");
        Ok(())
    }

    fn finalize_published_scores(&self, total_score_factor: f64) -> Result<usize, StorageError> {
        let written = self.db.with_immediate_transaction(|tx| {
            total_scores::recompute_total_scores(tx, &self.poll, total_score_factor)
        })?;
        tracing::debug!(poll = %self.poll, totals = written, "recomputed total scores");
        Ok(written)
    }
}

/// Opens a [`SqliteScoreStore`] with a fresh connection on every call.
#[derive(Debug, Clone)]
pub struct SqliteStoreFactory {
    path: PathBuf,
    busy_timeout_ms: u64,
}

impl SqliteStoreFactory {
    /// Creates the factory and brings the database schema up to date once,
    /// so workers opening concurrently only ever read `user_version`.
    pub fn new(path: impl Into<PathBuf>, config: &StorageConfig) -> Result<Self, StorageError> {
        let factory = Self {
            path: path.into(),
            busy_timeout_ms: config.effective_busy_timeout_ms(),
        };
        drop(DatabaseManager::open_with_timeout(&factory.path, factory.busy_timeout_ms)?);
        Ok(factory)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreFactory for SqliteStoreFactory {
    type Store = SqliteScoreStore;

    fn open(&self, poll: &str) -> Result<Self::Store, StorageError> {
        let db = DatabaseManager::open_with_timeout(&self.path, self.busy_timeout_ms)?;
        Ok(SqliteScoreStore::new(db, poll))
    }
}
