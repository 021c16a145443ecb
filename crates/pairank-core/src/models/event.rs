//! Trigger events carried from the comparison write path.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A comparison was inserted, updated, or deleted.
///
/// Only primitive identifiers: the event is cloned into every criterion
/// worker and must never carry a storage handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEvent {
    pub poll: String,
    pub user_id: UserId,
    pub entity_a_uid: String,
    pub entity_b_uid: String,
    pub is_delete: bool,
}

impl ComparisonEvent {
    /// An insert or update of the comparison between `a` and `b`.
    pub fn upsert(
        poll: impl Into<String>,
        user_id: UserId,
        entity_a_uid: impl Into<String>,
        entity_b_uid: impl Into<String>,
    ) -> Self {
        Self {
            poll: poll.into(),
            user_id,
            entity_a_uid: entity_a_uid.into(),
            entity_b_uid: entity_b_uid.into(),
            is_delete: false,
        }
    }

    /// The comparison between `a` and `b` was deleted.
    pub fn deletion(
        poll: impl Into<String>,
        user_id: UserId,
        entity_a_uid: impl Into<String>,
        entity_b_uid: impl Into<String>,
    ) -> Self {
        Self {
            is_delete: true,
            ..Self::upsert(poll, user_id, entity_a_uid, entity_b_uid)
        }
    }
}
