//! Storage-layer errors for SQLite operations.

use super::error_code::{self, PairankErrorCode};

/// Errors raised by the persistence layer.
///
/// A failed write never leaves a partial row set behind: every write path
/// runs inside one transaction, so these surface only after rollback.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("database busy")]
    DbBusy,

    #[error("not found: {what}")]
    NotFound { what: String },
}

impl StorageError {
    /// Convenience constructor used by query modules.
    pub fn sqlite(message: impl Into<String>) -> Self {
        Self::SqliteError {
            message: message.into(),
        }
    }
}

impl PairankErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::DbBusy => error_code::DB_BUSY,
            Self::NotFound { .. } => error_code::NOT_FOUND,
        }
    }
}
