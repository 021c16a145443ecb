//! Configuration system for pairank.
//! TOML-based, 4-layer resolution: overrides > env > project > user > defaults.

pub mod estimator_config;
pub mod fanout_config;
pub mod pairank_config;
pub mod scores_config;
pub mod storage_config;

pub use estimator_config::EstimatorConfig;
pub use fanout_config::FanOutConfig;
pub use pairank_config::{ConfigOverrides, PairankConfig};
pub use scores_config::{DeletionPolicy, ScoresConfig};
pub use storage_config::StorageConfig;
