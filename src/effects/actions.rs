//! State-level verbs behind `actions.*`.
//!
//! Targets arrive already resolved to entity IDs, players or hexes.
//! Targets that have vanished since resolution are skipped. Anything that
//! changes occupancy or object existence reconciles abilities before
//! returning.

use std::sync::Arc;

use crate::cards::{Attribute, CardDefinition};
use crate::core::{EntityId, GameState, PlayerColor};
use crate::error::{ScriptError, ScriptResult};
use crate::hex::HexId;
use crate::script::{self, Frame, Program};
use crate::triggers;

use super::abilities::unapply_everywhere;
use super::lifecycle::{self, Destination, CAUSE_EFFECT};

fn definition(state: &GameState, name: &str) -> ScriptResult<Arc<CardDefinition>> {
    state
        .registry
        .by_name(name)
        .cloned()
        .ok_or_else(|| ScriptError::UnknownCard(name.to_string()))
}

/// Subtract `amount` health from each target, fire `afterDamageReceived`
/// for each, then destroy whatever died.
pub fn deal_damage(
    state: &mut GameState,
    targets: &[EntityId],
    amount: i64,
    cause: &str,
) -> ScriptResult<()> {
    let hits: Vec<(EntityId, i64)> = targets.iter().map(|&id| (id, amount)).collect();
    lifecycle::damage_objects(state, &hits, cause)
}

pub fn destroy(state: &mut GameState, targets: &[EntityId]) -> ScriptResult<()> {
    for &id in targets {
        lifecycle::destroy_object(state, id, CAUSE_EFFECT)?;
    }
    Ok(())
}

pub fn draw(state: &mut GameState, players: &[PlayerColor], count: usize) {
    for &player in players {
        state.draw_cards(player, count);
    }
}

/// Move cards from hand to their holder's discard pile.
pub fn discard(state: &mut GameState, cards: &[EntityId]) {
    for &id in cards {
        if let Some((color, card)) = state.take_card(id) {
            let text = format!("{} discarded {}", state.player(color).username, card.name());
            state.player_mut(color).discard_pile.push_back(card);
            state.log_message(Some(color), text);
        }
    }
}

/// Permanently set a base attribute, clamped to the stat range. `cost`
/// sets the underlying card's cost, clamped at zero.
pub fn set_attribute(state: &mut GameState, id: EntityId, attr: Attribute, value: i64) {
    let clamped = state.config.clamp_stat(value);
    let Some(object) = state.object_mut(id) else {
        return;
    };
    match attr {
        Attribute::Cost => object.card.cost = value.max(0),
        stat => {
            if object.stats.get(stat).is_some() {
                object.stats.set(stat, clamped);
            }
        }
    }
}

pub fn set_card_cost(state: &mut GameState, card: EntityId, value: i64) {
    state.update_card(card, |c| c.cost = value.max(0));
}

/// Exchange two base attributes on each target.
pub fn swap_attributes(
    state: &mut GameState,
    targets: &[EntityId],
    first: Attribute,
    second: Attribute,
) -> ScriptResult<()> {
    for &id in targets {
        let Some(object) = state.object(id) else {
            continue;
        };
        if let (Some(a), Some(b)) = (object.base_attribute(first), object.base_attribute(second)) {
            set_attribute(state, id, first, b);
            set_attribute(state, id, second, a);
        }
    }
    triggers::apply_abilities(state)
}

/// Set available energy, clamped to `[0, energy_cap]`.
pub fn set_energy(state: &mut GameState, player: PlayerColor, value: i64) {
    let cap = state.config.energy_cap;
    state.player_mut(player).energy.available = value.clamp(0, cap);
}

/// Spend energy; a player who cannot pay marks the effect invalid.
pub fn pay_energy(state: &mut GameState, players: &[PlayerColor], amount: i64) {
    for &player in players {
        let energy = &mut state.player_mut(player).energy;
        if energy.available < amount {
            state.invalid = true;
            return;
        }
        energy.available -= amount;
    }
}

pub fn return_to_hand(state: &mut GameState, targets: &[EntityId]) -> ScriptResult<()> {
    for &id in targets {
        if let Some(object) = state.object(id) {
            if object.is_kernel() {
                continue;
            }
            let text = format!("{} returned to hand", object.name());
            lifecycle::remove_object(state, id, Destination::Hand)?;
            state.log_message(None, text);
        }
    }
    Ok(())
}

/// Move each target onto `player`'s side of the board, keeping its hex.
pub fn take_control(
    state: &mut GameState,
    player: PlayerColor,
    targets: &[EntityId],
) -> ScriptResult<()> {
    for &id in targets {
        let Some((color, hex)) = state.locate(id) else {
            continue;
        };
        if color == player {
            continue;
        }
        if let Some(object) = state.player_mut(color).board.remove(&hex) {
            let text = format!(
                "{} took control of {}",
                state.player(player).username,
                object.name()
            );
            state.player_mut(player).board.insert(hex, object);
            state.log_message(Some(player), text);
        }
    }
    triggers::apply_abilities(state)
}

/// Create a new object from a named card on each unoccupied hex.
pub fn spawn_object(
    state: &mut GameState,
    name: &str,
    hexes: &[HexId],
    owner: PlayerColor,
) -> ScriptResult<()> {
    let def = definition(state, name)?;
    let grid = state.config.grid();
    for &hex in hexes {
        if !grid.contains(hex) || state.is_occupied(hex) {
            continue;
        }
        let card = state.new_card(def.clone());
        lifecycle::place_object(state, owner, card, hex)?;
    }
    Ok(())
}

/// Turn each target into a copy of the named card: new stats and cost,
/// and only the new card's abilities.
pub fn become_card(state: &mut GameState, targets: &[EntityId], name: &str) -> ScriptResult<()> {
    let def = definition(state, name)?;
    for &id in targets {
        let Some((color, _)) = state.locate(id) else {
            continue;
        };
        let Some(object) = state.object_mut(id) else {
            continue;
        };
        let old = std::mem::take(&mut object.abilities);
        object.triggers.clear();
        object.activated_abilities.clear();
        object.card.definition = def.clone();
        object.card.cost = def.cost;
        object.card.cost_adjustments.clear();
        object.stats = def.stats;
        for ability in &old {
            unapply_everywhere(state, ability);
        }
        for source in &def.abilities {
            let program = Program::compile(source)?;
            script::execute(state, &program, Frame::for_object(color, id))?;
        }
    }
    triggers::apply_abilities(state)
}

/// Run a nested program on each target, tagging what it installs with a
/// fresh source ID.
pub fn give_ability(
    state: &mut GameState,
    targets: &[EntityId],
    program: &Program,
) -> ScriptResult<()> {
    let source = state.alloc_id();
    for &id in targets {
        let Some((color, _)) = state.locate(id) else {
            continue;
        };
        script::execute(state, program, Frame::for_object(color, id).with_source(source))?;
    }
    triggers::apply_abilities(state)
}

fn relocate(state: &mut GameState, id: EntityId, to: HexId) {
    let Some((color, from)) = state.locate(id) else {
        return;
    };
    let board = &mut state.player_mut(color).board;
    if let Some(object) = board.remove(&from) {
        board.insert(to, object);
    }
}

/// Move targets onto hexes pairwise. Occupied or off-board destinations
/// are skipped. No `afterMoved` event fires.
pub fn move_objects(
    state: &mut GameState,
    targets: &[EntityId],
    hexes: &[HexId],
) -> ScriptResult<()> {
    let grid = state.config.grid();
    for (&id, &hex) in targets.iter().zip(hexes) {
        if grid.contains(hex) && !state.is_occupied(hex) {
            relocate(state, id, hex);
        }
    }
    triggers::apply_abilities(state)
}

pub fn swap_positions(state: &mut GameState, a: EntityId, b: EntityId) -> ScriptResult<()> {
    let (Some((color_a, hex_a)), Some((color_b, hex_b))) = (state.locate(a), state.locate(b)) else {
        return Ok(());
    };
    if a == b {
        return Ok(());
    }
    let first = state.player_mut(color_a).board.remove(&hex_a);
    let second = state.player_mut(color_b).board.remove(&hex_b);
    if let (Some(first), Some(second)) = (first, second) {
        state.player_mut(color_a).board.insert(hex_b, first);
        state.player_mut(color_b).board.insert(hex_a, second);
    }
    triggers::apply_abilities(state)
}

/// Insert new copies of the named cards at random positions in each
/// player's deck. With a shared deck both copies of the deck get the card
/// at the same position.
pub fn shuffle_into_deck(
    state: &mut GameState,
    players: &[PlayerColor],
    names: &[String],
) -> ScriptResult<()> {
    for &player in players {
        for name in names {
            let def = definition(state, name)?;
            let card = state.new_card(def);
            let len = state.player(player).deck.len();
            let index = state.rng.gen_range_usize(0..len + 1);
            if state.shared_deck {
                let other = &mut state.player_mut(player.opponent()).deck;
                let at = index.min(other.len());
                other.insert(at, card.clone());
            }
            state.player_mut(player).deck.insert(index, card);
        }
    }
    Ok(())
}

/// Strip every passive, triggered and activated ability from the targets.
pub fn remove_all_abilities(state: &mut GameState, targets: &[EntityId]) -> ScriptResult<()> {
    for &id in targets {
        let Some(object) = state.object_mut(id) else {
            continue;
        };
        let old = std::mem::take(&mut object.abilities);
        object.triggers.clear();
        object.activated_abilities.clear();
        for ability in &old {
            unapply_everywhere(state, ability);
        }
    }
    triggers::apply_abilities(state)
}

/// Heal each target back up to its printed health.
pub fn restore_health(state: &mut GameState, targets: &[EntityId]) {
    for &id in targets {
        if let Some(object) = state.object_mut(id) {
            let printed = object.card.definition.stats.health;
            if let (Some(current), Some(printed)) = (object.stats.health, printed) {
                object.stats.health = Some(current.max(printed));
            }
        }
    }
}

/// `canMoveAgain` / `canAttackAgain` / `canMoveAndAttackAgain`.
pub fn refresh(state: &mut GameState, targets: &[EntityId], movement: bool, attack: bool) {
    for &id in targets {
        if let Some(object) = state.object_mut(id) {
            if movement {
                object.cant_move = false;
                object.moves_made = 0;
            }
            if attack {
                object.cant_attack = false;
            }
        }
    }
}
