//! Individual, scaled, and global score rows.

use serde::{Deserialize, Serialize};

use super::AggregationMode;
use crate::constants::{DEFAULT_SCALE, DEFAULT_TRANSLATION};
use crate::types::{EntityId, UserId};

/// A contributor's latent preference for one entity on one criterion, before scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualRawScore {
    pub user_id: UserId,
    pub entity_id: EntityId,
    pub criterion: String,
    pub raw_score: f64,
    pub raw_uncertainty: f64,
}

/// Per-contributor linear correction, computed by the batch aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScaling {
    pub user_id: UserId,
    pub criterion: String,
    pub scale: f64,
    pub scale_uncertainty: f64,
    pub translation: f64,
    pub translation_uncertainty: f64,
}

impl UserScaling {
    /// The scaling used when none is stored: (1, 0, 0, 0).
    pub fn identity(user_id: UserId, criterion: impl Into<String>) -> Self {
        Self {
            user_id,
            criterion: criterion.into(),
            scale: DEFAULT_SCALE,
            scale_uncertainty: 0.0,
            translation: DEFAULT_TRANSLATION,
            translation_uncertainty: 0.0,
        }
    }

    /// Scaled score of a raw score.
    pub fn scaled_score(&self, raw_score: f64) -> f64 {
        raw_score * self.scale + self.translation
    }

    /// Scaled uncertainty, propagating both the raw and the scaling uncertainties.
    pub fn scaled_uncertainty(&self, raw_score: f64, raw_uncertainty: f64) -> f64 {
        self.scale * raw_uncertainty
            + self.scale_uncertainty * raw_score.abs()
            + self.translation_uncertainty
    }
}

/// Visibility and trust flags of a contributor's rating of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingProperties {
    pub user_id: UserId,
    pub entity_id: EntityId,
    pub is_public: bool,
    pub is_trusted: bool,
    pub is_supertrusted: bool,
}

impl RatingProperties {
    /// Flags assumed when no rating row exists: all false.
    pub fn absent(user_id: UserId, entity_id: EntityId) -> Self {
        Self {
            user_id,
            entity_id,
            is_public: false,
            is_trusted: false,
            is_supertrusted: false,
        }
    }
}

/// An individual score after the contributor's scaling was applied,
/// joined with the rating's trust flags. Input of the global aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledIndividualScore {
    pub user_id: UserId,
    pub entity_id: EntityId,
    pub criterion: String,
    pub raw_score: f64,
    pub raw_uncertainty: f64,
    pub score: f64,
    pub uncertainty: f64,
    pub is_public: bool,
    pub is_trusted: bool,
    pub is_supertrusted: bool,
}

impl ScaledIndividualScore {
    pub fn from_parts(
        raw: &IndividualRawScore,
        scaling: &UserScaling,
        properties: &RatingProperties,
    ) -> Self {
        Self {
            user_id: raw.user_id,
            entity_id: raw.entity_id,
            criterion: raw.criterion.clone(),
            raw_score: raw.raw_score,
            raw_uncertainty: raw.raw_uncertainty,
            score: scaling.scaled_score(raw.raw_score),
            uncertainty: scaling.scaled_uncertainty(raw.raw_score, raw.raw_uncertainty),
            is_public: properties.is_public,
            is_trusted: properties.is_trusted,
            is_supertrusted: properties.is_supertrusted,
        }
    }
}

/// One entity's aggregate as returned by a global aggregator, before it
/// is tagged with its criterion and mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAggregate {
    pub entity_id: EntityId,
    pub score: f64,
    pub uncertainty: f64,
    pub deviation: f64,
}

/// A published per-entity score for one criterion and one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalEntityScore {
    pub entity_id: EntityId,
    pub criterion: String,
    pub mode: AggregationMode,
    pub score: f64,
    pub uncertainty: f64,
    pub deviation: f64,
}

impl GlobalEntityScore {
    pub fn tagged(aggregate: EntityAggregate, criterion: &str, mode: AggregationMode) -> Self {
        Self {
            entity_id: aggregate.entity_id,
            criterion: criterion.to_string(),
            mode,
            score: aggregate.score,
            uncertainty: aggregate.uncertainty,
            deviation: aggregate.deviation,
        }
    }
}
