//! Local estimator configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ALPHA, DEFAULT_R_MAX};

/// Model constants of the local estimator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Maximum absolute comparison score. Default: 10.
    pub r_max: Option<f64>,
    /// Regularisation added to every diagonal term. Default: 0.01.
    pub alpha: Option<f64>,
}

impl EstimatorConfig {
    pub fn effective_r_max(&self) -> f64 {
        self.r_max.unwrap_or(DEFAULT_R_MAX)
    }

    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(DEFAULT_ALPHA)
    }
}
