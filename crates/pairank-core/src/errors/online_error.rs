//! Online update errors.

use super::error_code::{self, PairankErrorCode};
use super::{ConfigError, EstimationError, StorageError};

/// Errors that abort one criterion's online update.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum OnlineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Estimation error: {0}")]
    Estimation(#[from] EstimationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown entity uid: {uid}")]
    UnknownEntity { uid: String },

    #[error("Worker for criterion '{criterion}' panicked: {message}")]
    WorkerPanic { criterion: String, message: String },
}

impl PairankErrorCode for OnlineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Estimation(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::UnknownEntity { .. } => error_code::UNKNOWN_ENTITY,
            Self::WorkerPanic { .. } => error_code::WORKER_PANIC,
        }
    }
}
