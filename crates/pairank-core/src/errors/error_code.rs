//! PairankErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable
/// code string next to its human-readable message.
pub trait PairankErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const ESTIMATION_ERROR: &str = "ESTIMATION_ERROR";
pub const UNKNOWN_ENTITY: &str = "UNKNOWN_ENTITY";
pub const WORKER_PANIC: &str = "WORKER_PANIC";
