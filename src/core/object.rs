//! Objects: cards instantiated onto the board.
//!
//! An `Object` owns its current base stats, the adjustments and status
//! effects other abilities have applied to it, the abilities it carries,
//! and per-turn bookkeeping. Computed attributes (base stats folded
//! through adjustments and clamped) are read through
//! `GameState::attribute`, because adjustment closures may inspect the
//! rest of the board.

use serde::{Deserialize, Serialize};

use super::ability::{
    ActivatedAbility, EffectKind, ObjectEffect, PassiveAbility, StatAdjustment, TriggeredAbility,
};
use super::entity::EntityId;
use crate::cards::{Attribute, CardInstance, CardType, Stats};

/// Boolean object properties readable by `conditions.hasProperty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Property {
    AttackedLastTurn,
    AttackedThisTurn,
    MovedLastTurn,
    MovedThisTurn,
    IsDamaged,
}

impl std::str::FromStr for Property {
    type Err = crate::error::ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attackedlastturn" => Ok(Property::AttackedLastTurn),
            "attackedthisturn" => Ok(Property::AttackedThisTurn),
            "movedlastturn" => Ok(Property::MovedLastTurn),
            "movedthisturn" => Ok(Property::MovedThisTurn),
            "isdamaged" => Ok(Property::IsDamaged),
            other => Err(crate::error::ScriptError::UnknownProperty(other.to_string())),
        }
    }
}

/// A card on the board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Object {
    pub id: EntityId,

    /// The card this object was played from.
    pub card: CardInstance,

    /// Current base stats; damage and permanent modifications land here.
    pub stats: Stats,

    /// Revocable adjustments, folded in insertion order.
    pub adjustments: Vec<StatAdjustment>,

    pub effects: Vec<ObjectEffect>,

    pub abilities: Vec<PassiveAbility>,
    pub triggers: Vec<TriggeredAbility>,
    pub activated_abilities: Vec<ActivatedAbility>,

    /// Hexes moved so far this turn.
    pub moves_made: i64,
    pub moved_this_turn: bool,
    pub attacked_this_turn: bool,
    pub moved_last_turn: bool,
    pub attacked_last_turn: bool,

    pub cant_move: bool,
    pub cant_attack: bool,
    pub cant_activate: bool,

    /// The last object this one fought.
    pub most_recent_opponent: Option<EntityId>,

    /// Set once the destroy pipeline has started for this object.
    pub being_destroyed: bool,
}

impl Object {
    /// Instantiate a card. Stats start at the card's printed values.
    #[must_use]
    pub fn new(id: EntityId, card: CardInstance) -> Self {
        let stats = card.definition.stats;
        Self {
            id,
            card,
            stats,
            adjustments: Vec::new(),
            effects: Vec::new(),
            abilities: Vec::new(),
            triggers: Vec::new(),
            activated_abilities: Vec::new(),
            moves_made: 0,
            moved_this_turn: false,
            attacked_this_turn: false,
            moved_last_turn: false,
            attacked_last_turn: false,
            cant_move: false,
            cant_attack: false,
            cant_activate: false,
            most_recent_opponent: None,
            being_destroyed: false,
        }
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.card.card_type()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.card.name()
    }

    #[must_use]
    pub fn is_robot(&self) -> bool {
        self.card_type() == CardType::Robot
    }

    #[must_use]
    pub fn is_kernel(&self) -> bool {
        self.card_type() == CardType::Kernel
    }

    #[must_use]
    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Objects this object is restricted to attacking, if any
    /// `canonlyattack` effect applies. Multiple restrictions intersect.
    #[must_use]
    pub fn allowed_attack_targets(&self) -> Option<Vec<EntityId>> {
        let mut allowed: Option<Vec<EntityId>> = None;
        for effect in self.effects.iter().filter(|e| e.kind == EffectKind::CanOnlyAttack) {
            let ids = effect.allowed.clone().unwrap_or_default();
            allowed = Some(match allowed {
                None => ids,
                Some(prev) => prev.into_iter().filter(|id| ids.contains(id)).collect(),
            });
        }
        allowed
    }

    /// Remove everything `ability` applied to this object.
    pub fn remove_applied(&mut self, ability: EntityId) {
        self.adjustments.retain(|a| a.ability != ability);
        self.effects.retain(|e| e.ability != ability);
    }

    /// Remove abilities, triggers and activated abilities installed by `source`.
    pub fn remove_given(&mut self, source: EntityId) -> Vec<PassiveAbility> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.abilities)
            .into_iter()
            .partition(|a| a.source == Some(source));
        self.abilities = kept;
        self.triggers.retain(|t| t.source != Some(source));
        self.activated_abilities.retain(|a| a.source != Some(source));
        removed
    }

    /// Whether `property` currently holds. `IsDamaged` compares against the
    /// printed health, since damage lowers the base stat.
    #[must_use]
    pub fn has_property(&self, property: Property) -> bool {
        match property {
            Property::AttackedLastTurn => self.attacked_last_turn,
            Property::AttackedThisTurn => self.attacked_this_turn,
            Property::MovedLastTurn => self.moved_last_turn,
            Property::MovedThisTurn => self.moved_this_turn,
            Property::IsDamaged => match (self.stats.health, self.card.definition.stats.health) {
                (Some(current), Some(printed)) => current < printed,
                _ => false,
            },
        }
    }

    /// Base value of an attribute before adjustments.
    #[must_use]
    pub fn base_attribute(&self, attr: Attribute) -> Option<i64> {
        match attr {
            Attribute::Cost => Some(self.card.cost),
            stat => self.stats.get(stat),
        }
    }

    /// Clear the flags that reset at the start of the controller's turn.
    pub fn reset_turn_flags(&mut self) {
        self.moves_made = 0;
        self.moved_this_turn = false;
        self.attacked_this_turn = false;
        self.cant_move = false;
        self.cant_attack = false;
        self.cant_activate = false;
    }

    /// Roll this turn's flags into last turn's.
    pub fn end_turn_flags(&mut self) {
        self.moved_last_turn = self.moved_this_turn;
        self.attacked_last_turn = self.attacked_this_turn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use std::sync::Arc;

    fn robot() -> Object {
        let def = Arc::new(CardDefinition::robot("Bot", 2, 2, 3, 1));
        Object::new(EntityId(2), CardInstance::new(EntityId(1), def))
    }

    #[test]
    fn test_new_object_copies_stats() {
        let obj = robot();
        assert_eq!(obj.stats, Stats::robot(2, 3, 1));
        assert!(obj.is_robot());
        assert_eq!(obj.base_attribute(Attribute::Cost), Some(2));
    }

    #[test]
    fn test_is_damaged() {
        let mut obj = robot();
        assert!(!obj.has_property(Property::IsDamaged));
        obj.stats.adjust(Attribute::Health, -1);
        assert!(obj.has_property(Property::IsDamaged));
    }

    #[test]
    fn test_allowed_attack_targets_intersect() {
        let mut obj = robot();
        assert_eq!(obj.allowed_attack_targets(), None);

        obj.effects.push(ObjectEffect {
            ability: EntityId(10),
            kind: EffectKind::CanOnlyAttack,
            allowed: Some(vec![EntityId(5), EntityId(6)]),
        });
        obj.effects.push(ObjectEffect {
            ability: EntityId(11),
            kind: EffectKind::CanOnlyAttack,
            allowed: Some(vec![EntityId(6)]),
        });
        assert_eq!(obj.allowed_attack_targets(), Some(vec![EntityId(6)]));

        obj.remove_applied(EntityId(11));
        assert_eq!(obj.allowed_attack_targets(), Some(vec![EntityId(5), EntityId(6)]));
    }

    #[test]
    fn test_turn_flags_roll_over() {
        let mut obj = robot();
        obj.moved_this_turn = true;
        obj.cant_attack = true;

        obj.end_turn_flags();
        assert!(obj.moved_last_turn);

        obj.reset_turn_flags();
        assert!(!obj.moved_this_turn);
        assert!(!obj.cant_attack);
        assert!(obj.moved_last_turn);
    }

    #[test]
    fn test_property_names() {
        assert_eq!("isdamaged".parse::<Property>().unwrap(), Property::IsDamaged);
        assert!("flying".parse::<Property>().is_err());
    }
}
