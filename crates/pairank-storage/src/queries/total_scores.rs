//! Queries for the entity_total_scores table.

use pairank_core::errors::StorageError;
use pairank_core::models::AggregationMode;
use pairank_core::types::EntityId;
use rusqlite::{params, Connection};

/// A published per-entity total.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalScoreRow {
    pub entity_id: EntityId,
    pub total_score: f64,
}

/// Rebuild every total of the poll from the default-mode criterion scores.
/// Call inside a transaction. Returns the number of totals written.
///
/// Summation runs in (entity, criterion) order so the result does not depend
/// on the order the criterion rows were written in.
pub fn recompute_total_scores(
    conn: &Connection,
    poll: &str,
    total_score_factor: f64,
) -> Result<usize, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, score FROM entity_criteria_scores
             WHERE poll = ?1 AND score_mode = ?2
             ORDER BY entity_id, criterion",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params![poll, AggregationMode::Default.as_str()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
        })
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let mut totals: Vec<(i64, f64)> = Vec::new();
    for row in rows {
        let (entity_id, score) = row.map_err(|e| StorageError::sqlite(e.to_string()))?;
        match totals.last_mut() {
            Some((last, sum)) if *last == entity_id => *sum += score,
            _ => totals.push((entity_id, score)),
        }
    }

    conn.execute(
        "DELETE FROM entity_total_scores WHERE poll = ?1",
        params![poll],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let mut insert = conn
        .prepare_cached(
            "INSERT INTO entity_total_scores (poll, entity_id, total_score) VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;
    for (entity_id, sum) in &totals {
        insert
            .execute(params![poll, entity_id, total_score_factor * sum])
            .map_err(|e| StorageError::sqlite(e.to_string()))?;
    }

    Ok(totals.len())
}

pub fn query_total_scores(conn: &Connection, poll: &str) -> Result<Vec<TotalScoreRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, total_score FROM entity_total_scores
             WHERE poll = ?1 ORDER BY entity_id",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params![poll], |row| {
            Ok(TotalScoreRow {
                entity_id: EntityId(row.get(0)?),
                total_score: row.get(1)?,
            })
        })
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::sqlite(e.to_string()))
}
