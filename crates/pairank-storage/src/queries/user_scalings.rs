//! Queries for the user_scalings table.

use pairank_core::errors::StorageError;
use pairank_core::models::UserScaling;
use pairank_core::types::UserId;
use rusqlite::{params, Connection};

pub fn upsert_user_scaling(
    conn: &Connection,
    poll: &str,
    scaling: &UserScaling,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO user_scalings
            (poll, user_id, criterion, scale, scale_uncertainty, translation, translation_uncertainty)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(poll, user_id, criterion) DO UPDATE SET
            scale = excluded.scale,
            scale_uncertainty = excluded.scale_uncertainty,
            translation = excluded.translation,
            translation_uncertainty = excluded.translation_uncertainty",
        params![
            poll,
            scaling.user_id.get(),
            scaling.criterion,
            scaling.scale,
            scaling.scale_uncertainty,
            scaling.translation,
            scaling.translation_uncertainty,
        ],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))?;
    Ok(())
}

/// Stored scalings, optionally for one contributor.
pub fn query_user_scalings(
    conn: &Connection,
    poll: &str,
    user: Option<UserId>,
) -> Result<Vec<UserScaling>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT user_id, criterion, scale, scale_uncertainty, translation, translation_uncertainty
             FROM user_scalings
             WHERE poll = ?1 AND (?2 IS NULL OR user_id = ?2)
             ORDER BY user_id, criterion",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params![poll, user.map(UserId::get)], |row| {
            Ok(UserScaling {
                user_id: UserId(row.get(0)?),
                criterion: row.get(1)?,
                scale: row.get(2)?,
                scale_uncertainty: row.get(3)?,
                translation: row.get(4)?,
                translation_uncertainty: row.get(5)?,
            })
        })
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::sqlite(e.to_string()))
}
