//! Attack legality, declaration and resolution.
//!
//! Attacks are two-step: `declare_attack` records a pending attack (the
//! UI animates it), `resolve_attack` applies it. Resolution fires
//! `afterAttack`, whose default behavior is simultaneous damage: both
//! attack values are read before either side takes damage.

use crate::cards::Attribute;
use crate::core::{EffectKind, GameState, PendingAttack, TriggerKind};
use crate::effects::{damage_objects, CAUSE_COMBAT};
use crate::error::ScriptResult;
use crate::hex::HexId;
use crate::triggers::{self, GameEvent};

use super::movement::{move_object, reachable, valid_movement_hexes};

/// Hexes the object at `hex` may attack this turn, in hex order.
///
/// Reach is the adjacency of its own hex and every hex it could move to.
/// Only enemy objects qualify. If any candidate has taunt, only taunting
/// candidates remain; `canonlyattack` narrows the set further.
#[must_use]
pub fn valid_attack_hexes(state: &GameState, hex: HexId) -> Vec<HexId> {
    let Some((color, object)) = state.object_at(hex) else {
        return Vec::new();
    };
    if !object.is_robot()
        || object.cant_attack
        || object.has_effect(EffectKind::CannotAttack)
        || state.attribute(object.id, Attribute::Attack).unwrap_or(0) <= 0
    {
        return Vec::new();
    }

    let grid = state.config.grid();
    let mut origins = vec![hex];
    origins.extend(valid_movement_hexes(state, hex));

    let mut targets: Vec<HexId> = origins
        .iter()
        .flat_map(|origin| grid.adjacent(*origin))
        .filter(|h| state.object_at(*h).is_some_and(|(c, _)| c != color))
        .collect();
    targets.sort();
    targets.dedup();

    let taunting: Vec<HexId> = targets
        .iter()
        .copied()
        .filter(|h| state.object_at(*h).is_some_and(|(_, o)| o.has_effect(EffectKind::Taunt)))
        .collect();
    if !taunting.is_empty() {
        targets = taunting;
    }

    if let Some(allowed) = object.allowed_attack_targets() {
        targets.retain(|h| state.object_at(*h).is_some_and(|(_, o)| allowed.contains(&o.id)));
    }
    targets
}

/// Declare an attack from `from` on `to`.
///
/// An attacker that is not adjacent first moves to the nearest hex
/// adjacent to the target (ties broken by hex order).
pub fn declare_attack(state: &mut GameState, from: HexId, to: HexId) -> ScriptResult<()> {
    if state.attack.is_some() {
        return Ok(());
    }
    let Some((color, _)) = state.object_at(from) else {
        return Ok(());
    };
    if color != state.current_turn || !valid_attack_hexes(state, from).contains(&to) {
        return Ok(());
    }

    let mut origin = from;
    if from.distance(to) != 1 {
        let step = reachable(state, from)
            .into_iter()
            .filter(|(h, _)| h.distance(to) == 1)
            .min_by_key(|(h, steps)| (*steps, *h));
        let Some((step, _)) = step else {
            return Ok(());
        };
        move_object(state, from, step)?;
        origin = step;
        if state.object_at(origin).is_none() || state.object_at(to).is_none() {
            return Ok(());
        }
    }

    log::debug!("{color} declares attack {origin} -> {to}");
    state.attack = Some(PendingAttack { from: origin, to });
    state.play_sound("attack");
    Ok(())
}

/// Resolve the pending attack, if any.
pub fn resolve_attack(state: &mut GameState) -> ScriptResult<()> {
    let Some(PendingAttack { from, to }) = state.attack.take() else {
        return Ok(());
    };
    let (Some((color, attacker)), Some((_, defender))) =
        (state.object_at(from), state.object_at(to))
    else {
        return Ok(());
    };
    let (attacker, defender) = (attacker.id, defender.id);
    let text = format!(
        "{} attacked {}",
        state.object(attacker).map(|o| o.name()).unwrap_or_default(),
        state.object(defender).map(|o| o.name()).unwrap_or_default(),
    );
    let tag = state.object(defender).map(|o| o.card_type().name()).unwrap_or_default();

    if let Some(object) = state.object_mut(attacker) {
        object.attacked_this_turn = true;
        object.cant_attack = true;
        object.cant_move = true;
        object.most_recent_opponent = Some(defender);
    }
    if let Some(object) = state.object_mut(defender) {
        object.most_recent_opponent = Some(attacker);
    }
    state.log_message(Some(color), text);

    let mut strike = |state: &mut GameState| -> ScriptResult<()> {
        let attack = state.attribute(attacker, Attribute::Attack).unwrap_or(0);
        let fights_back = state
            .object(defender)
            .is_some_and(|o| !o.has_effect(EffectKind::CannotFightBack));
        let counter = if fights_back {
            state.attribute(defender, Attribute::Attack).unwrap_or(0)
        } else {
            0
        };
        let mut hits = vec![(defender, attack)];
        if counter > 0 {
            hits.push((attacker, counter));
        }
        damage_objects(state, &hits, CAUSE_COMBAT)?;

        let defender_gone = state.object(defender).is_none();
        let survivor = state.locate(attacker).filter(|_| {
            state.object(attacker).is_some_and(|o| o.is_robot())
                && state.attribute(attacker, Attribute::Health).unwrap_or(0) > 0
        });
        if let (true, Some((owner, at))) = (defender_gone, survivor) {
            if !state.is_occupied(to) {
                let board = &mut state.player_mut(owner).board;
                if let Some(object) = board.remove(&at) {
                    board.insert(to, object);
                }
                triggers::apply_abilities(state)?;
            }
        }
        Ok(())
    };

    let event = GameEvent::new(TriggerKind::AfterAttack)
        .with_object(attacker)
        .with_player(color)
        .with_undergoer(defender)
        .with_tag(tag);
    triggers::trigger_event(state, &event, Some(&mut strike))
}
