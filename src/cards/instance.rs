//! Card instances - runtime card state.
//!
//! `CardInstance` is one physical card in a deck, hand or discard pile.
//! It shares its `CardDefinition` through an `Arc` and tracks the only
//! mutable card-level data the game has: the current base cost (which
//! effects can permanently change) and the cost adjustments that passive
//! abilities have layered on top of it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardType};
use crate::core::ability::StatAdjustment;
use crate::core::entity::EntityId;

/// A card instance in a game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub id: EntityId,

    /// Shared static definition.
    pub definition: Arc<CardDefinition>,

    /// Base cost before adjustments. Starts at the printed cost.
    pub cost: i64,

    /// Cost adjustments applied by passive abilities, in application order.
    #[serde(default)]
    pub cost_adjustments: Vec<StatAdjustment>,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: EntityId, definition: Arc<CardDefinition>) -> Self {
        let cost = definition.cost;
        Self {
            id,
            definition,
            cost,
            cost_adjustments: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.definition.card_type
    }

    /// Remove every cost adjustment installed by `ability`.
    pub fn remove_adjustments_from(&mut self, ability: EntityId) {
        self.cost_adjustments.retain(|adj| adj.ability != ability);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance_copies_printed_cost() {
        let def = Arc::new(CardDefinition::robot("Recruiter", 4, 2, 2, 1));
        let card = CardInstance::new(EntityId(3), def);

        assert_eq!(card.cost, 4);
        assert_eq!(card.name(), "Recruiter");
        assert_eq!(card.card_type(), CardType::Robot);
        assert!(card.cost_adjustments.is_empty());
    }
}
