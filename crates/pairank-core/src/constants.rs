//! Shared constants for the pairank engine.

/// Largest absolute comparison score a contributor can submit.
pub const DEFAULT_R_MAX: f64 = 10.0;

/// Ridge term added to every diagonal curvature so a single comparison
/// still yields a finite estimate.
pub const DEFAULT_ALPHA: f64 = 0.01;

/// Multiplier applied to the sum of per-criterion scores when publishing
/// an entity's total score.
pub const DEFAULT_TOTAL_SCORE_FACTOR: f64 = 10.0;

/// SQLite busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Default scale when a contributor has no stored scaling.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Default translation when a contributor has no stored scaling.
pub const DEFAULT_TRANSLATION: f64 = 0.0;

/// Sweep cap for the reference full re-solve.
pub const DEFAULT_MAX_SWEEPS: usize = 100_000;

/// Convergence tolerance (max absolute change per sweep) for the reference full re-solve.
pub const DEFAULT_SOLVE_TOLERANCE: f64 = 1e-12;

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "PAIRANK_LOG";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "pairank.toml";
