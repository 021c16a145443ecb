//! Criterion fan-out configuration.

use serde::{Deserialize, Serialize};

/// Controls how per-criterion updates are scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FanOutConfig {
    /// Run criteria on a worker pool. Default: true.
    pub parallel: Option<bool>,
    /// Worker count. Default: available parallelism minus one, at least 1.
    pub workers: Option<usize>,
}

impl FanOutConfig {
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    /// Returns the configured worker count, or one less than the machine's
    /// available parallelism (never below 1).
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1)
        })
    }
}
