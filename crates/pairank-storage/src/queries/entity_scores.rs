//! Queries for the entity_criteria_scores table (published global scores).

use std::str::FromStr;

use pairank_core::errors::StorageError;
use pairank_core::models::{AggregationMode, GlobalEntityScore};
use pairank_core::traits::ReplaceScope;
use pairank_core::types::EntityId;
use rusqlite::{params, Connection};

/// Delete the (criterion, mode) rows selected by `scope`, then insert `rows`.
/// Call inside a transaction. Every row is stored under `criterion` and `mode`.
pub fn replace_entity_criteria_scores(
    conn: &Connection,
    poll: &str,
    criterion: &str,
    mode: AggregationMode,
    scope: ReplaceScope<'_>,
    rows: &[GlobalEntityScore],
) -> Result<usize, StorageError> {
    match scope {
        ReplaceScope::Criterion => {
            conn.execute(
                "DELETE FROM entity_criteria_scores
                 WHERE poll = ?1 AND criterion = ?2 AND score_mode = ?3",
                params![poll, criterion, mode.as_str()],
            )
            .map_err(|e| StorageError::sqlite(e.to_string()))?;
        }
        ReplaceScope::Entities(entities) => {
            let mut delete = conn
                .prepare_cached(
                    "DELETE FROM entity_criteria_scores
                     WHERE poll = ?1 AND criterion = ?2 AND score_mode = ?3 AND entity_id = ?4",
                )
                .map_err(|e| StorageError::sqlite(e.to_string()))?;
            for entity in entities.iter().chain(rows.iter().map(|row| &row.entity_id)) {
                delete
                    .execute(params![poll, criterion, mode.as_str(), entity.get()])
                    .map_err(|e| StorageError::sqlite(e.to_string()))?;
            }
        }
    }

    let mut insert = conn
        .prepare_cached(
            "INSERT INTO entity_criteria_scores
                (poll, entity_id, criterion, score_mode, score, uncertainty, deviation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    for row in rows {
        insert
            .execute(params![
                poll,
                row.entity_id.get(),
                criterion,
                mode.as_str(),
                row.score,
                row.uncertainty,
                row.deviation,
            ])
            .map_err(|e| StorageError::sqlite(e.to_string()))?;
    }

    Ok(rows.len())
}

/// Published scores, optionally filtered, ordered by (criterion, mode, entity).
pub fn query_entity_criteria_scores(
    conn: &Connection,
    poll: &str,
    criterion: Option<&str>,
    mode: Option<AggregationMode>,
) -> Result<Vec<GlobalEntityScore>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, criterion, score_mode, score, uncertainty, deviation
             FROM entity_criteria_scores
             WHERE poll = ?1 AND (?2 IS NULL OR criterion = ?2) AND (?3 IS NULL OR score_mode = ?3)
             ORDER BY criterion, score_mode, entity_id",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params![poll, criterion, mode.map(AggregationMode::as_str)], |row| {
            Ok((
                EntityId(row.get(0)?),
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, f64>(5)?,
            ))
        })
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let mut scores = Vec::new();
    for row in rows {
        let (entity_id, criterion, mode, score, uncertainty, deviation) =
            row.map_err(|e| StorageError::sqlite(e.to_string()))?;
        let mode = AggregationMode::from_str(&mode).map_err(StorageError::sqlite)?;
        scores.push(GlobalEntityScore {
            entity_id,
            criterion,
            mode,
            score,
            uncertainty,
            deviation,
        });
    }
    Ok(scores)
}
