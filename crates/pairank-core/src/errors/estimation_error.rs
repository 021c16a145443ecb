//! Local estimator errors.

use super::error_code::{self, PairankErrorCode};
use crate::types::EntityId;

/// Errors raised by the local estimator.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("no comparisons to estimate from")]
    NoComparisons,

    #[error("estimate for entity {entity} is not finite")]
    NonFinite { entity: EntityId },
}

impl PairankErrorCode for EstimationError {
    fn error_code(&self) -> &'static str {
        error_code::ESTIMATION_ERROR
    }
}
