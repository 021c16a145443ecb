//! Queries for the individual_scores table.

use pairank_core::errors::StorageError;
use pairank_core::models::IndividualRawScore;
use pairank_core::traits::IndividualScoreFilter;
use pairank_core::types::{EntityId, UserId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Update the (user, entity, criterion) row in place, or insert it.
pub fn upsert_individual_score(
    conn: &Connection,
    poll: &str,
    score: &IndividualRawScore,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO individual_scores
            (poll, user_id, entity_id, criterion, raw_score, raw_uncertainty)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(poll, user_id, entity_id, criterion) DO UPDATE SET
            raw_score = excluded.raw_score,
            raw_uncertainty = excluded.raw_uncertainty",
        params![
            poll,
            score.user_id.get(),
            score.entity_id.get(),
            score.criterion,
            score.raw_score,
            score.raw_uncertainty,
        ],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))?;
    Ok(())
}

/// Returns true if a row was deleted.
pub fn delete_individual_score(
    conn: &Connection,
    poll: &str,
    user: UserId,
    entity: EntityId,
    criterion: &str,
) -> Result<bool, StorageError> {
    let deleted = conn
        .execute(
            "DELETE FROM individual_scores
             WHERE poll = ?1 AND user_id = ?2 AND entity_id = ?3 AND criterion = ?4",
            params![poll, user.get(), entity.get(), criterion],
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;
    Ok(deleted > 0)
}

/// Rows matching every set field of `filter`, ordered by (criterion, user, entity).
pub fn query_individual_scores(
    conn: &Connection,
    poll: &str,
    filter: &IndividualScoreFilter,
) -> Result<Vec<IndividualRawScore>, StorageError> {
    if matches!(&filter.entity_in, Some(ids) if ids.is_empty()) {
        return Ok(Vec::new());
    }

    let mut sql = String::from(
        "SELECT user_id, entity_id, criterion, raw_score, raw_uncertainty
         FROM individual_scores WHERE poll = ?",
    );
    let mut values: Vec<Value> = vec![Value::Text(poll.to_string())];

    if let Some(criterion) = &filter.criterion {
        sql.push_str(" AND criterion = ?");
        values.push(Value::Text(criterion.clone()));
    }
    if let Some(user) = filter.user {
        sql.push_str(" AND user_id = ?");
        values.push(Value::Integer(user.get()));
    }
    if let Some(entity) = filter.entity {
        sql.push_str(" AND entity_id = ?");
        values.push(Value::Integer(entity.get()));
    }
    if let Some(ids) = &filter.entity_in {
        let placeholders = vec!["?"; ids.len()].join(", ");
        sql.push_str(&format!(" AND entity_id IN ({placeholders})"));
        values.extend(ids.iter().map(|id| Value::Integer(id.get())));
    }
    sql.push_str(" ORDER BY criterion, user_id, entity_id");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(IndividualRawScore {
                user_id: UserId(row.get(0)?),
                entity_id: EntityId(row.get(1)?),
                criterion: row.get(2)?,
                raw_score: row.get(3)?,
                raw_uncertainty: row.get(4)?,
            })
        })
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::sqlite(e.to_string()))
}
