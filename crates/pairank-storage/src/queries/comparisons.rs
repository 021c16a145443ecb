//! Queries for the comparisons table.
//!
//! A comparison is stored once per unordered pair: writing (b, a) replaces
//! an existing (a, b) row for the same contributor and criterion.

use pairank_core::errors::StorageError;
use pairank_core::models::Comparison;
use pairank_core::types::{EntityId, UserId};
use rusqlite::{params, Connection};

/// Insert or replace a comparison. Call inside a transaction: the old row
/// is deleted before the new one is inserted.
pub fn upsert_comparison(
    conn: &Connection,
    poll: &str,
    comparison: &Comparison,
) -> Result<(), StorageError> {
    delete_comparison(
        conn,
        poll,
        comparison.user_id,
        comparison.entity_a,
        comparison.entity_b,
        Some(&comparison.criterion),
    )?;

    conn.execute(
        "INSERT INTO comparisons (poll, user_id, entity_a, entity_b, criterion, score, weight)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            poll,
            comparison.user_id.get(),
            comparison.entity_a.get(),
            comparison.entity_b.get(),
            comparison.criterion,
            comparison.score,
            comparison.weight,
        ],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))?;
    Ok(())
}

/// Delete the comparison between `a` and `b` in either direction, on one
/// criterion or (with `None`) on all of them. Returns the number of rows deleted.
pub fn delete_comparison(
    conn: &Connection,
    poll: &str,
    user: UserId,
    a: EntityId,
    b: EntityId,
    criterion: Option<&str>,
) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM comparisons
         WHERE poll = ?1 AND user_id = ?2
           AND ((entity_a = ?3 AND entity_b = ?4) OR (entity_a = ?4 AND entity_b = ?3))
           AND (?5 IS NULL OR criterion = ?5)",
        params![poll, user.get(), a.get(), b.get(), criterion],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))
}

/// Comparisons on `criterion`, optionally for one contributor, in insertion order.
pub fn query_comparisons(
    conn: &Connection,
    poll: &str,
    criterion: &str,
    user: Option<UserId>,
) -> Result<Vec<Comparison>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT user_id, entity_a, entity_b, criterion, score, weight
             FROM comparisons
             WHERE poll = ?1 AND criterion = ?2 AND (?3 IS NULL OR user_id = ?3)
             ORDER BY id",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params![poll, criterion, user.map(UserId::get)], |row| {
            Ok(Comparison {
                user_id: UserId(row.get(0)?),
                entity_a: EntityId(row.get(1)?),
                entity_b: EntityId(row.get(2)?),
                criterion: row.get(3)?,
                score: row.get(4)?,
                weight: row.get(5)?,
            })
        })
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::sqlite(e.to_string()))
}
