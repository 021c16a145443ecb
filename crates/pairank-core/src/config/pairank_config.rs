//! Top-level pairank configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DeletionPolicy, EstimatorConfig, FanOutConfig, ScoresConfig, StorageConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`PAIRANK_*`)
/// 3. Project config (`pairank.toml` in the project root)
/// 4. User config (`~/.pairank/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PairankConfig {
    pub estimator: EstimatorConfig,
    pub fanout: FanOutConfig,
    pub scores: ScoresConfig,
    pub storage: StorageConfig,
}

/// Overrides supplied by the embedding application.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub r_max: Option<f64>,
    pub alpha: Option<f64>,
    pub parallel: Option<bool>,
    pub workers: Option<usize>,
    pub deletion_policy: Option<DeletionPolicy>,
}

impl PairankConfig {
    /// Load configuration with 4-layer resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority)
        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &PairankConfig) -> Result<(), ConfigError> {
        if let Some(r_max) = config.estimator.r_max {
            if !(r_max.is_finite() && r_max > 0.0) {
                return Err(invalid("estimator.r_max", "must be a finite value greater than 0"));
            }
        }
        if let Some(alpha) = config.estimator.alpha {
            if !(alpha.is_finite() && alpha > 0.0) {
                return Err(invalid("estimator.alpha", "must be a finite value greater than 0"));
            }
        }
        if config.fanout.workers == Some(0) {
            return Err(invalid("fanout.workers", "must be at least 1"));
        }
        if let Some(factor) = config.scores.total_score_factor {
            if !factor.is_finite() {
                return Err(invalid("scores.total_score_factor", "must be finite"));
            }
        }
        if config.storage.busy_timeout_ms == Some(0) {
            return Err(invalid("storage.busy_timeout_ms", "must be greater than 0"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.pairank/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut PairankConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PairankConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut PairankConfig, other: &PairankConfig) {
        if other.estimator.r_max.is_some() {
            base.estimator.r_max = other.estimator.r_max;
        }
        if other.estimator.alpha.is_some() {
            base.estimator.alpha = other.estimator.alpha;
        }

        if other.fanout.parallel.is_some() {
            base.fanout.parallel = other.fanout.parallel;
        }
        if other.fanout.workers.is_some() {
            base.fanout.workers = other.fanout.workers;
        }

        if other.scores.total_score_factor.is_some() {
            base.scores.total_score_factor = other.scores.total_score_factor;
        }
        if other.scores.deletion_policy.is_some() {
            base.scores.deletion_policy = other.scores.deletion_policy;
        }

        if other.storage.busy_timeout_ms.is_some() {
            base.storage.busy_timeout_ms = other.storage.busy_timeout_ms;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PAIRANK_ESTIMATOR_R_MAX`, `PAIRANK_FANOUT_WORKERS`, etc.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut PairankConfig) {
        if let Some(v) = env_parsed::<f64>("PAIRANK_ESTIMATOR_R_MAX") {
            config.estimator.r_max = Some(v);
        }
        if let Some(v) = env_parsed::<f64>("PAIRANK_ESTIMATOR_ALPHA") {
            config.estimator.alpha = Some(v);
        }
        if let Some(v) = env_parsed::<bool>("PAIRANK_FANOUT_PARALLEL") {
            config.fanout.parallel = Some(v);
        }
        if let Some(v) = env_parsed::<usize>("PAIRANK_FANOUT_WORKERS") {
            config.fanout.workers = Some(v);
        }
        if let Some(v) = env_parsed::<f64>("PAIRANK_SCORES_TOTAL_SCORE_FACTOR") {
            config.scores.total_score_factor = Some(v);
        }
        if let Some(v) = env_parsed::<DeletionPolicy>("PAIRANK_SCORES_DELETION_POLICY") {
            config.scores.deletion_policy = Some(v);
        }
        if let Some(v) = env_parsed::<u64>("PAIRANK_STORAGE_BUSY_TIMEOUT_MS") {
            config.storage.busy_timeout_ms = Some(v);
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut PairankConfig, o: &ConfigOverrides) {
        if let Some(v) = o.r_max {
            config.estimator.r_max = Some(v);
        }
        if let Some(v) = o.alpha {
            config.estimator.alpha = Some(v);
        }
        if let Some(v) = o.parallel {
            config.fanout.parallel = Some(v);
        }
        if let Some(v) = o.workers {
            config.fanout.workers = Some(v);
        }
        if let Some(v) = o.deletion_policy {
            config.scores.deletion_policy = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

/// Returns the user-level config directory: `~/.pairank/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".pairank"))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
