//! Score publication configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOTAL_SCORE_FACTOR;

/// What happens to an individual score whose entity lost its last comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Keep the row; the estimator drives it to exactly zero.
    #[default]
    Zero,
    /// Delete the row.
    Remove,
}

impl DeletionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(Self::Zero),
            "remove" => Ok(Self::Remove),
            other => Err(format!("unknown deletion policy: {other}")),
        }
    }
}

/// Configuration of published scores.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoresConfig {
    /// Multiplier applied when summing criterion scores into the total. Default: 10.
    pub total_score_factor: Option<f64>,
    /// Default: zero.
    pub deletion_policy: Option<DeletionPolicy>,
}

impl ScoresConfig {
    pub fn effective_total_score_factor(&self) -> f64 {
        self.total_score_factor.unwrap_or(DEFAULT_TOTAL_SCORE_FACTOR)
    }

    pub fn effective_deletion_policy(&self) -> DeletionPolicy {
        self.deletion_policy.unwrap_or_default()
    }
}
