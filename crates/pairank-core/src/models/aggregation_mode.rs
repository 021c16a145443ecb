//! Trust-tier aggregation modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A published view of the global scores, computed from a subset or
/// weighting of contributors. The set is closed: every online update
/// recomputes every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Trust-weighted view over all contributors.
    Default,
    /// Every contributor weighs the same.
    AllEqual,
    /// Only trusted contributors are counted.
    TrustedOnly,
}

impl AggregationMode {
    /// All modes, in persistence order.
    pub const ALL: [AggregationMode; 3] = [Self::Default, Self::AllEqual, Self::TrustedOnly];

    /// Stable string form stored in the `score_mode` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::AllEqual => "all_equal",
            Self::TrustedOnly => "trusted_only",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "all_equal" => Ok(Self::AllEqual),
            "trusted_only" => Ok(Self::TrustedOnly),
            other => Err(format!("unknown aggregation mode: {other}")),
        }
    }
}
