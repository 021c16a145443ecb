//! Pairwise comparison rows.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, UserId};

/// One contributor's judgement between two entities on one criterion.
///
/// `(a, b, score)` is equivalent to `(b, a, -score)`. A positive score means
/// the contributor leans towards `entity_b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub user_id: UserId,
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub criterion: String,
    pub score: f64,
    pub weight: f64,
}

impl Comparison {
    pub fn new(
        user_id: UserId,
        entity_a: EntityId,
        entity_b: EntityId,
        criterion: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            user_id,
            entity_a,
            entity_b,
            criterion: criterion.into(),
            score,
            weight: 1.0,
        }
    }

    /// True if this comparison is between `x` and `y`, in either direction.
    pub fn is_between(&self, x: EntityId, y: EntityId) -> bool {
        (self.entity_a == x && self.entity_b == y) || (self.entity_a == y && self.entity_b == x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_matches_in_either_direction() {
        let c = Comparison::new(UserId(1), EntityId(1), EntityId(2), "reliability", 4.0);
        assert!(c.is_between(EntityId(1), EntityId(2)));
        assert!(c.is_between(EntityId(2), EntityId(1)));
        assert!(!c.is_between(EntityId(1), EntityId(3)));
        assert_eq!(c.weight, 1.0);
    }
}
