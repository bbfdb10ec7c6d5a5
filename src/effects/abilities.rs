//! Installing abilities on objects and applying passive abilities to
//! their targets.
//!
//! A passive ability leaves tagged records behind on each target
//! (`StatAdjustment`, `ObjectEffect`, cost adjustments on cards, or whole
//! abilities installed by a nested program). `unapply_from` removes every
//! record carrying the ability's ID, so apply/unapply always balance.

use crate::cards::{Attribute, AttributeSelector};
use crate::core::{
    AbilityTargets, ActivatedAbility, EntityId, GameState, ObjectEffect, PassiveAbility,
    PassiveKind, StatAdjustment, TriggerSpec, TriggeredAbility,
};
use crate::error::ScriptResult;
use crate::script::{self, AbilityDraft, Closure, Frame};
use crate::targeting::{self, Collection};

/// Frame a stored closure runs in when its owner acts: the closure's
/// captured frame, re-bound to the owner and its current controller.
#[must_use]
pub fn owner_frame(state: &GameState, owner: EntityId, base: &Frame) -> Frame {
    let mut frame = base.clone();
    frame.this_object = Some(owner);
    if let Some((color, _)) = state.locate(owner) {
        frame.player = color;
    }
    frame
}

/// `setAbility`: attach a drafted ability to the executing object.
///
/// Without an executing object on the board this does nothing. The new
/// ability takes effect at the next reconciliation.
pub fn install_ability(
    state: &mut GameState,
    frame: &Frame,
    draft: AbilityDraft,
    duration: Option<u32>,
    one_shot: bool,
) {
    let Some(owner) = frame.this_object.filter(|id| state.locate(*id).is_some()) else {
        return;
    };
    let id = state.alloc_id();
    let Some(object) = state.object_mut(owner) else {
        return;
    };
    match draft {
        AbilityDraft::Passive { kind, targets } => object.abilities.push(PassiveAbility {
            id,
            source: frame.source,
            kind,
            targets,
            current_targets: Vec::new(),
            disabled: false,
            one_shot,
            duration,
        }),
        AbilityDraft::Activated { action, text } => {
            object.activated_abilities.push(ActivatedAbility {
                id,
                source: frame.source,
                action,
                text,
                duration,
            })
        }
    }
}

/// `setTrigger`: attach a triggered ability to the executing object.
pub fn install_trigger(
    state: &mut GameState,
    frame: &Frame,
    trigger: TriggerSpec,
    action: Closure,
    override_default: bool,
    duration: Option<u32>,
) {
    let Some(owner) = frame.this_object.filter(|id| state.locate(*id).is_some()) else {
        return;
    };
    let id = state.alloc_id();
    if let Some(object) = state.object_mut(owner) {
        object.triggers.push(TriggeredAbility {
            id,
            source: frame.source,
            trigger,
            action,
            override_default,
            duration,
        });
    }
}

/// Temporary `modifyAttribute`: an adjustment ability on the target
/// itself that expires after `duration` end-of-turn sweeps.
pub fn add_temporary_adjustment(
    state: &mut GameState,
    target: EntityId,
    attribute: AttributeSelector,
    func: Closure,
    duration: u32,
) {
    if state.locate(target).is_none() {
        return;
    }
    let id = state.alloc_id();
    if let Some(object) = state.object_mut(target) {
        object.abilities.push(PassiveAbility {
            id,
            source: None,
            kind: PassiveKind::AttributeAdjustment { attribute, func },
            targets: AbilityTargets::Fixed(Collection::Objects(vec![target])),
            current_targets: Vec::new(),
            disabled: false,
            one_shot: false,
            duration: Some(duration),
        });
    }
}

/// Entities a resolved target collection refers to: board objects (kernels
/// for players, occupants for hexes) or cards.
#[must_use]
pub fn target_entities(state: &GameState, collection: &Collection) -> Vec<EntityId> {
    match collection {
        Collection::CardsInHand(ids) | Collection::CardsInDiscardPile(ids) => ids
            .iter()
            .copied()
            .filter(|id| state.card(*id).is_some())
            .collect(),
        other => targeting::object_ids(state, other, "ability").unwrap_or_default(),
    }
}

/// Apply a passive ability owned by `owner` to one target.
pub fn apply_to(
    state: &mut GameState,
    owner: EntityId,
    ability: &PassiveAbility,
    target: EntityId,
) -> ScriptResult<()> {
    match &ability.kind {
        PassiveKind::ApplyEffect { effect, allowed } => {
            let allowed = match allowed {
                Some(targets) => {
                    let frame = targets_frame(state, owner, targets);
                    let collection = script::evaluate_targets(state, targets, frame)?;
                    Some(target_entities(state, &collection))
                }
                None => None,
            };
            if let Some(object) = state.object_mut(target) {
                object.effects.push(ObjectEffect {
                    ability: ability.id,
                    kind: *effect,
                    allowed,
                });
            }
        }
        PassiveKind::AttributeAdjustment { attribute, func } => {
            let adjustments: Vec<StatAdjustment> = attribute
                .attributes()
                .into_iter()
                .map(|attribute| StatAdjustment {
                    ability: ability.id,
                    attribute,
                    func: func.clone(),
                })
                .collect();
            if let Some(object) = state.object_mut(target) {
                for adj in adjustments {
                    if adj.attribute == Attribute::Cost {
                        object.card.cost_adjustments.push(adj);
                    } else {
                        object.adjustments.push(adj);
                    }
                }
            } else if let Some(adj) =
                adjustments.into_iter().find(|a| a.attribute == Attribute::Cost)
            {
                state.update_card(target, |card| card.cost_adjustments.push(adj.clone()));
            }
        }
        PassiveKind::GiveAbility { program } => {
            if let Some((color, _)) = state.locate(target) {
                let frame = Frame::for_object(color, target).with_source(ability.id);
                script::execute(state, program, frame)?;
            }
        }
    }
    Ok(())
}

/// Remove everything ability `ability` left on `target`, including
/// abilities it gave (and, recursively, what those applied).
pub fn unapply_from(state: &mut GameState, ability: EntityId, target: EntityId) {
    let Some(object) = state.object_mut(target) else {
        state.update_card(target, |card| card.remove_adjustments_from(ability));
        return;
    };
    object.remove_applied(ability);
    object.card.remove_adjustments_from(ability);
    let given = object.remove_given(ability);
    for removed in given {
        unapply_everywhere(state, &removed);
    }
}

/// Unapply a passive ability from all of its current targets.
pub fn unapply_everywhere(state: &mut GameState, ability: &PassiveAbility) {
    for target in &ability.current_targets {
        unapply_from(state, ability.id, *target);
    }
}

fn targets_frame(state: &GameState, owner: EntityId, targets: &AbilityTargets) -> Frame {
    match targets {
        AbilityTargets::Deferred(closure) => owner_frame(state, owner, &closure.frame),
        AbilityTargets::Fixed(_) => Frame::for_player(state.current_turn),
    }
}

/// Frame for evaluating a passive ability's own target descriptor.
#[must_use]
pub fn ability_frame(state: &GameState, owner: EntityId, ability: &PassiveAbility) -> Frame {
    targets_frame(state, owner, &ability.targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRegistry};
    use crate::core::{EffectKind, GameConfig, Object, PlayerColor, PlayerMap};
    use crate::hex::HexId;
    use std::sync::Arc;

    fn state_with_robot() -> (GameState, EntityId) {
        let mut state = GameState::new(
            GameConfig::default(),
            Arc::new(CardRegistry::new()),
            PlayerMap::new(|c| c.name().to_string()),
            3,
        );
        let card = state.new_card(Arc::new(CardDefinition::robot("Bot", 1, 2, 2, 1)));
        let id = state.alloc_id();
        state
            .player_mut(PlayerColor::Orange)
            .board
            .insert(HexId::new(0, 0), Object::new(id, card));
        (state, id)
    }

    fn taunt(id: EntityId, target: EntityId) -> PassiveAbility {
        PassiveAbility {
            id,
            source: None,
            kind: PassiveKind::ApplyEffect {
                effect: EffectKind::Taunt,
                allowed: None,
            },
            targets: AbilityTargets::Fixed(Collection::Objects(vec![target])),
            current_targets: vec![target],
            disabled: false,
            one_shot: false,
            duration: None,
        }
    }

    #[test]
    fn test_apply_and_unapply_balance() {
        let (mut state, bot) = state_with_robot();
        let ability = taunt(EntityId(500), bot);

        apply_to(&mut state, bot, &ability, bot).unwrap();
        assert!(state.object(bot).unwrap().has_effect(EffectKind::Taunt));

        unapply_everywhere(&mut state, &ability);
        assert!(!state.object(bot).unwrap().has_effect(EffectKind::Taunt));
    }

    #[test]
    fn test_temporary_adjustment_is_installed_on_target() {
        let (mut state, bot) = state_with_robot();
        let func = Closure::constant(Frame::for_player(PlayerColor::Orange), 5);

        let selector = AttributeSelector::One(Attribute::Attack);
        add_temporary_adjustment(&mut state, bot, selector, func, 1);

        let object = state.object(bot).unwrap();
        assert_eq!(object.abilities.len(), 1);
        assert_eq!(object.abilities[0].duration, Some(1));
    }

    #[test]
    fn test_install_without_object_is_noop() {
        let (mut state, bot) = state_with_robot();
        let draft = AbilityDraft::Activated {
            action: Closure::constant(Frame::for_player(PlayerColor::Orange), 0),
            text: "noop".into(),
        };

        install_ability(&mut state, &Frame::for_player(PlayerColor::Orange), draft, None, false);

        assert!(state.object(bot).unwrap().activated_abilities.is_empty());
    }
}
