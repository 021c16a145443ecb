//! Write helpers: BEGIN IMMEDIATE transactions.

use pairank_core::errors::StorageError;
use rusqlite::{Connection, ErrorCode, TransactionBehavior};

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// The write lock is taken at transaction start, so a busy database fails
/// here instead of halfway through the unit of work.
pub fn with_immediate_transaction<F, T>(conn: &mut Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => StorageError::DbBusy,
            _ => StorageError::SqliteError {
                message: format!("failed to begin immediate transaction: {e}"),
            },
        })?;

    // Dropping `tx` on the error path rolls back.
    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}
