//! Error handling for pairank.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod estimation_error;
pub mod online_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::PairankErrorCode;
pub use estimation_error::EstimationError;
pub use online_error::OnlineError;
pub use storage_error::StorageError;
