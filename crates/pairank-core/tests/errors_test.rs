//! Tests for error codes and conversions.

use pairank_core::errors::{
    ConfigError, EstimationError, OnlineError, PairankErrorCode, StorageError,
};
use pairank_core::types::EntityId;

#[test]
fn test_storage_error_codes() {
    assert_eq!(StorageError::sqlite("disk I/O").error_code(), "STORAGE_ERROR");
    assert_eq!(StorageError::DbBusy.error_code(), "DB_BUSY");
    assert_eq!(
        StorageError::MigrationFailed {
            version: 1,
            message: "boom".into()
        }
        .error_code(),
        "MIGRATION_FAILED"
    );
    assert_eq!(
        StorageError::NotFound {
            what: "entity".into()
        }
        .error_code(),
        "NOT_FOUND"
    );
}

#[test]
fn test_online_error_forwards_inner_code() {
    let err: OnlineError = StorageError::DbBusy.into();
    assert_eq!(err.error_code(), "DB_BUSY");

    let err: OnlineError = EstimationError::NonFinite {
        entity: EntityId(4),
    }
    .into();
    assert_eq!(err.error_code(), "ESTIMATION_ERROR");

    let err: OnlineError = ConfigError::FileNotFound {
        path: "pairank.toml".into(),
    }
    .into();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_coded_string_prefixes_message() {
    let err = OnlineError::UnknownEntity {
        uid: "yt:abc".into(),
    };
    assert_eq!(err.coded_string(), "[UNKNOWN_ENTITY] Unknown entity uid: yt:abc");

    let err = OnlineError::WorkerPanic {
        criterion: "reliability".into(),
        message: "index out of bounds".into(),
    };
    assert!(err.coded_string().starts_with("[WORKER_PANIC] "));
    assert!(err.to_string().contains("reliability"));
}
