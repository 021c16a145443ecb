//! Read side of the storage port.

use crate::errors::StorageError;
use crate::models::{Comparison, IndividualRawScore, RatingProperties, UserScaling};
use crate::types::{EntityId, UserId};

/// Row filter for [`ScoreSource::individual_scores`]. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndividualScoreFilter {
    pub criterion: Option<String>,
    pub user: Option<UserId>,
    pub entity: Option<EntityId>,
    pub entity_in: Option<Vec<EntityId>>,
}

impl IndividualScoreFilter {
    pub fn criterion(criterion: impl Into<String>) -> Self {
        Self {
            criterion: Some(criterion.into()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_entity_in(mut self, entities: impl IntoIterator<Item = EntityId>) -> Self {
        self.entity_in = Some(entities.into_iter().collect());
        self
    }
}

/// Tabular views over one poll's stored state.
pub trait ScoreSource {
    /// Comparisons on `criterion`, optionally restricted to one contributor.
    fn comparisons(
        &self,
        criterion: &str,
        user: Option<UserId>,
    ) -> Result<Vec<Comparison>, StorageError>;

    /// Every rating's visibility and trust flags.
    fn ratings_properties(&self) -> Result<Vec<RatingProperties>, StorageError>;

    /// Stored scalings, optionally restricted to one contributor.
    fn user_scalings(&self, user: Option<UserId>) -> Result<Vec<UserScaling>, StorageError>;

    fn individual_scores(
        &self,
        filter: &IndividualScoreFilter,
    ) -> Result<Vec<IndividualRawScore>, StorageError>;

    /// Resolve a public entity uid to its numeric id.
    fn entity_id(&self, uid: &str) -> Result<Option<EntityId>, StorageError>;

    /// The poll's criteria, in display order.
    fn poll_criteria(&self) -> Result<Vec<String>, StorageError>;
}
