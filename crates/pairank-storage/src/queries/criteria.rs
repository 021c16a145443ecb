//! Queries for the poll_criteria table.

use pairank_core::errors::StorageError;
use rusqlite::{params, Connection};

/// Register a criterion for a poll, or move it to `rank`.
pub fn add_poll_criterion(
    conn: &Connection,
    poll: &str,
    criterion: &str,
    rank: i64,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO poll_criteria (poll, criterion, rank) VALUES (?1, ?2, ?3)
         ON CONFLICT(poll, criterion) DO UPDATE SET rank = excluded.rank",
        params![poll, criterion, rank],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))?;
    Ok(())
}

/// The poll's criteria ordered by rank, then name.
pub fn poll_criteria(conn: &Connection, poll: &str) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT criterion FROM poll_criteria WHERE poll = ?1 ORDER BY rank, criterion",
        )
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    let rows = stmt
        .query_map(params![poll], |row| row.get(0))
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    rows.collect::<Result<Vec<String>, _>>()
        .map_err(|e| StorageError::sqlite(e.to_string()))
}
