//! Passive-ability reconciliation and duration bookkeeping.
//!
//! `apply_abilities` re-evaluates every enabled passive ability's target
//! descriptor. Effects and attribute adjustments are then fully unapplied
//! from the recorded targets and reapplied to the new ones. Abilities that
//! give abilities are not recomputed that way: the new target set is
//! diffed against the recorded one, only departed targets are unapplied
//! and only arrivals are applied, so a target that stays in range keeps
//! what it was given. Either way the recorded targets end up equal to the
//! new set.
//!
//! Giving abilities can create new passive abilities, so passes repeat
//! (up to `MAX_PASSES`) until the set of passive abilities on the board
//! stops changing.

use crate::core::{EntityId, GameState, PassiveAbility, PassiveKind};
use crate::effects::abilities::{
    ability_frame, apply_to, target_entities, unapply_everywhere, unapply_from,
};
use crate::effects::{kill_dead_objects, CAUSE_EFFECT};
use crate::error::ScriptResult;
use crate::script;

const MAX_PASSES: usize = 4;

fn passive_ids(state: &GameState) -> Vec<EntityId> {
    state
        .board_order()
        .into_iter()
        .filter_map(|(_, _, id)| state.object(id))
        .flat_map(|object| object.abilities.iter().map(|a| a.id))
        .collect()
}

fn find_ability(state: &GameState, owner: EntityId, ability: EntityId) -> Option<PassiveAbility> {
    state
        .object(owner)?
        .abilities
        .iter()
        .find(|a| a.id == ability)
        .cloned()
}

fn reconcile_one(
    state: &mut GameState,
    owner: EntityId,
    ability: &PassiveAbility,
) -> ScriptResult<()> {
    let frame = ability_frame(state, owner, ability);
    let collection = script::evaluate_targets(state, &ability.targets, frame)?;
    let mut targets = target_entities(state, &collection);
    let mut seen = Vec::with_capacity(targets.len());
    targets.retain(|id| {
        let fresh = !seen.contains(id);
        seen.push(*id);
        fresh
    });

    match ability.kind {
        PassiveKind::GiveAbility { .. } => {
            for &old in &ability.current_targets {
                if !targets.contains(&old) {
                    unapply_from(state, ability.id, old);
                }
            }
            for &new in &targets {
                if !ability.current_targets.contains(&new) {
                    apply_to(state, owner, ability, new)?;
                }
            }
        }
        _ => {
            unapply_everywhere(state, ability);
            for &target in &targets {
                apply_to(state, owner, ability, target)?;
            }
        }
    }

    let stored = state
        .object_mut(owner)
        .and_then(|o| o.abilities.iter_mut().find(|a| a.id == ability.id));
    match stored {
        Some(stored) => {
            if stored.one_shot && !targets.is_empty() {
                stored.disabled = true;
            }
            stored.current_targets = targets;
        }
        None => {
            // The owner or the ability vanished while applying.
            for target in targets {
                unapply_from(state, ability.id, target);
            }
        }
    }
    Ok(())
}

fn reconcile_pass(state: &mut GameState) -> ScriptResult<()> {
    let entries: Vec<(EntityId, EntityId)> = state
        .board_order()
        .into_iter()
        .filter_map(|(_, _, id)| state.object(id))
        .flat_map(|object| {
            object
                .abilities
                .iter()
                .filter(|a| !a.disabled)
                .map(move |a| (object.id, a.id))
        })
        .collect();

    for (owner, id) in entries {
        let Some(ability) = find_ability(state, owner, id) else {
            continue;
        };
        if ability.disabled {
            continue;
        }
        reconcile_one(state, owner, &ability)?;
    }
    Ok(())
}

/// Reconcile every passive ability on the board, then destroy anything
/// left at zero health and check victory.
pub fn apply_abilities(state: &mut GameState) -> ScriptResult<()> {
    let mut before = passive_ids(state);
    for pass in 0..MAX_PASSES {
        log::trace!("reconciling abilities, pass {pass}");
        reconcile_pass(state)?;
        let after = passive_ids(state);
        if after == before {
            break;
        }
        before = after;
    }
    kill_dead_objects(state, CAUSE_EFFECT)?;
    state.check_victory();
    Ok(())
}

fn tick(duration: &mut Option<u32>) -> bool {
    match duration {
        Some(left) => {
            *left = left.saturating_sub(1);
            *left > 0
        }
        None => true,
    }
}

/// End-of-turn sweep: count down every ability carrying a duration and
/// remove those that reach zero.
pub fn sweep_durations(state: &mut GameState) -> ScriptResult<()> {
    for (_, _, id) in state.board_order() {
        let Some(object) = state.object_mut(id) else {
            continue;
        };
        let mut expired = Vec::new();
        object.abilities.retain_mut(|ability| {
            let keep = tick(&mut ability.duration);
            if !keep {
                expired.push(ability.clone());
            }
            keep
        });
        object.triggers.retain_mut(|trigger| tick(&mut trigger.duration));
        object.activated_abilities.retain_mut(|ability| tick(&mut ability.duration));
        for ability in &expired {
            unapply_everywhere(state, ability);
        }
    }
    apply_abilities(state)
}
