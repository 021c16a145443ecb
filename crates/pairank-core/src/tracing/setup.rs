//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "pairank_core=info,pairank_storage=info,pairank_online=info";

/// Initialize the pairank tracing/logging system.
///
/// Reads the `PAIRANK_LOG` environment variable for per-module log levels.
/// Format: `PAIRANK_LOG=pairank_online=debug,pairank_storage=warn`
///
/// Falls back to `info` for every pairank crate if `PAIRANK_LOG` is not set
/// or is invalid.
/// Idempotent. A subscriber installed by the host application is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
