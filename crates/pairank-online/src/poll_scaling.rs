//! Reference poll-level rescalings.

use pairank_core::models::{GlobalEntityScore, ScaledIndividualScore};
use pairank_core::traits::PollScaling;

/// Leaves every row unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IdentityPollScaling;

impl PollScaling for IdentityPollScaling {
    fn rescale_global(&self, _poll: &str, _rows: &mut [GlobalEntityScore]) {}

    fn rescale_individual(&self, _poll: &str, _rows: &mut [ScaledIndividualScore]) {}
}

/// `score * scale + translation`; spreads are multiplied by `|scale|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPollScaling {
    pub scale: f64,
    pub translation: f64,
}

impl LinearPollScaling {
    pub fn new(scale: f64, translation: f64) -> Self {
        Self { scale, translation }
    }
}

impl PollScaling for LinearPollScaling {
    fn rescale_global(&self, _poll: &str, rows: &mut [GlobalEntityScore]) {
        for row in rows {
            row.score = row.score * self.scale + self.translation;
            row.uncertainty *= self.scale.abs();
            row.deviation *= self.scale.abs();
        }
    }

    fn rescale_individual(&self, _poll: &str, rows: &mut [ScaledIndividualScore]) {
        for row in rows {
            row.score = row.score * self.scale + self.translation;
            row.uncertainty *= self.scale.abs();
        }
    }
}
