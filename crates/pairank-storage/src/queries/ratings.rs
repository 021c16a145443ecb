//! Queries for the contributor_ratings table.

use pairank_core::errors::StorageError;
use pairank_core::models::RatingProperties;
use pairank_core::types::{EntityId, UserId};
use rusqlite::{params, Connection};

pub fn upsert_rating_properties(
    conn: &Connection,
    poll: &str,
    rating: &RatingProperties,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO contributor_ratings
            (poll, user_id, entity_id, is_public, is_trusted, is_supertrusted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(poll, user_id, entity_id) DO UPDATE SET
            is_public = excluded.is_public,
            is_trusted = excluded.is_trusted,
            is_supertrusted = excluded.is_supertrusted",
        params![
            poll,
            rating.user_id.get(),
            rating.entity_id.get(),
            rating.is_public,
            rating.is_trusted,
            rating.is_supertrusted,
        ],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))?;
    Ok(())
}

pub fn query_ratings_properties(
    conn: &Connection,
    poll: &str,
) -> Result<Vec<RatingProperties>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT user_id, entity_id, is_public, is_trusted, is_supertrusted
             FROM contributor_ratings WHERE poll = ?1
             ORDER BY user_id, entity_id",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params![poll], |row| {
            Ok(RatingProperties {
                user_id: UserId(row.get(0)?),
                entity_id: EntityId(row.get(1)?),
                is_public: row.get(2)?,
                is_trusted: row.get(3)?,
                is_supertrusted: row.get(4)?,
            })
        })
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::sqlite(e.to_string()))
}
