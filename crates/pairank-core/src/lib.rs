//! # pairank-core
//!
//! Foundation crate for the pairank online scoring engine.
//! Defines identifiers, the score data model, the storage and collaborator
//! port traits, errors, config, tracing, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::PairankConfig;
pub use errors::{OnlineError, PairankErrorCode, StorageError};
pub use models::{
    AggregationMode, Comparison, ComparisonEvent, EntityAggregate, GlobalEntityScore,
    IndividualRawScore, RatingProperties, ScaledIndividualScore, UserScaling,
};
pub use types::{EntityId, UserId};
