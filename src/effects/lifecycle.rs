//! Object lifecycle: placing, destroying and removing board objects.
//!
//! Every function here changes board occupancy, so each one ends with a
//! reconciliation pass (which also kills anything left at zero health and
//! checks victory).

use crate::cards::{Attribute, CardInstance};
use crate::core::{EntityId, GameState, Object, PlayerColor, TriggerKind};
use crate::error::ScriptResult;
use crate::hex::HexId;
use crate::script::{self, Frame, Program};
use crate::triggers::{self, GameEvent};

use super::abilities::unapply_everywhere;

/// Damage and destruction from combat.
pub const CAUSE_COMBAT: &str = "combat";
/// Damage and destruction from card effects.
pub const CAUSE_EFFECT: &str = "effect";

/// Where a removed object's card goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Hand,
    DiscardPile,
}

/// Put a card onto the board for `owner` and run its ability programs.
///
/// Robots arrive unable to move, attack or activate this turn. Fires
/// `afterPlayed` tagged with the card type.
pub fn place_object(
    state: &mut GameState,
    owner: PlayerColor,
    mut card: CardInstance,
    hex: HexId,
) -> ScriptResult<EntityId> {
    // Hand discounts stay behind; board objects are re-targeted under their own ID.
    card.cost_adjustments.clear();
    let id = state.alloc_id();
    let definition = card.definition.clone();
    let mut object = Object::new(id, card);
    if object.is_robot() {
        object.cant_move = true;
        object.cant_attack = true;
        object.cant_activate = true;
    }
    log::debug!("placing {} for {owner} at {hex}", object.name());
    state.player_mut(owner).board.insert(hex, object);

    for source in &definition.abilities {
        let program = Program::compile(source)?;
        script::execute(state, &program, Frame::for_object(owner, id))?;
    }
    triggers::apply_abilities(state)?;

    let event = GameEvent::new(TriggerKind::AfterPlayed)
        .with_object(id)
        .with_player(owner)
        .with_tag(definition.card_type.name());
    triggers::trigger_event(state, &event, None)?;
    Ok(id)
}

/// Destroy an object: fire `afterDestroyed` tagged with `cause`, then
/// move it to its controller's discard pile.
///
/// An object already being destroyed is left alone, so the pipeline runs
/// at most once per object.
pub fn destroy_object(state: &mut GameState, id: EntityId, cause: &str) -> ScriptResult<()> {
    let Some(object) = state.object_mut(id) else {
        return Ok(());
    };
    if object.being_destroyed {
        return Ok(());
    }
    object.being_destroyed = true;
    finish_destroy(state, id, cause)
}

/// Mark every object at zero computed health as being destroyed and
/// return them in board order.
fn mark_dead(state: &mut GameState) -> Vec<EntityId> {
    let dead: Vec<EntityId> = state
        .board_order()
        .into_iter()
        .filter_map(|(_, _, id)| {
            let object = state.object(id)?;
            let health = state.attribute(id, Attribute::Health)?;
            (health <= 0 && !object.being_destroyed).then_some(id)
        })
        .collect();
    for &id in &dead {
        if let Some(object) = state.object_mut(id) {
            object.being_destroyed = true;
        }
    }
    dead
}

fn finish_destroy(state: &mut GameState, id: EntityId, cause: &str) -> ScriptResult<()> {
    let Some((color, _)) = state.locate(id) else {
        return Ok(());
    };
    let name = state.object(id).map(|o| o.name().to_string()).unwrap_or_default();
    state.log_message(Some(color), format!("{name} was destroyed"));
    state.play_sound("destroyed");

    let event = GameEvent::new(TriggerKind::AfterDestroyed)
        .with_object(id)
        .with_player(color)
        .with_tag(cause);
    triggers::trigger_event(state, &event, None)?;
    remove_object(state, id, Destination::DiscardPile)
}

/// Apply damage to several objects at once.
///
/// Every hit lands before anything is destroyed: health drops, the
/// objects that died are marked, `afterDamageReceived` fires for each
/// hit, and only then are the dead destroyed with `cause`.
pub fn damage_objects(
    state: &mut GameState,
    hits: &[(EntityId, i64)],
    cause: &str,
) -> ScriptResult<()> {
    let mut damaged = Vec::new();
    for &(id, amount) in hits {
        let amount = amount.max(0);
        let Some((color, _)) = state.locate(id) else {
            continue;
        };
        let Some(object) = state.object_mut(id) else {
            continue;
        };
        let Some(health) = object.stats.health else {
            continue;
        };
        object.stats.health = Some(health - amount);
        let name = object.name().to_string();
        let tag = object.card_type().name();
        state.log_message(Some(color), format!("{name} received {amount} damage"));
        state.play_sound("damage");
        damaged.push((id, color, tag));
    }

    let dying = mark_dead(state);
    for (id, color, tag) in damaged {
        let event = GameEvent::new(TriggerKind::AfterDamageReceived)
            .with_object(id)
            .with_player(color)
            .with_tag(tag);
        triggers::trigger_event(state, &event, None)?;
    }
    for id in dying {
        finish_destroy(state, id, cause)?;
    }
    kill_dead_objects(state, cause)
}

/// Take an object off the board, unapplying everything its abilities
/// applied, and send its card to `destination` with its printed cost.
///
/// Kernels leave the game entirely.
pub fn remove_object(
    state: &mut GameState,
    id: EntityId,
    destination: Destination,
) -> ScriptResult<()> {
    let Some((color, hex)) = state.locate(id) else {
        return Ok(());
    };
    let Some(object) = state.player_mut(color).board.remove(&hex) else {
        return Ok(());
    };
    for ability in &object.abilities {
        unapply_everywhere(state, ability);
    }

    if !object.is_kernel() {
        let mut card = object.card;
        card.cost = card.definition.cost;
        card.cost_adjustments.clear();
        let player = state.player_mut(color);
        match destination {
            Destination::Hand => player.hand.push_back(card),
            Destination::DiscardPile => player.discard_pile.push_back(card),
        }
    }
    triggers::apply_abilities(state)
}

/// Destroy every object whose computed health has dropped to zero.
pub fn kill_dead_objects(state: &mut GameState, cause: &str) -> ScriptResult<()> {
    loop {
        let dead = mark_dead(state);
        if dead.is_empty() {
            return Ok(());
        }
        for id in dead {
            finish_destroy(state, id, cause)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRegistry};
    use crate::core::{GameConfig, PlayerMap};
    use std::sync::Arc;

    fn new_state() -> GameState {
        GameState::new(
            GameConfig::default(),
            Arc::new(CardRegistry::new()),
            PlayerMap::new(|c| c.name().to_string()),
            11,
        )
    }

    fn place(
        state: &mut GameState,
        owner: PlayerColor,
        def: CardDefinition,
        hex: HexId,
    ) -> EntityId {
        let card = state.new_card(Arc::new(def));
        place_object(state, owner, card, hex).unwrap()
    }

    #[test]
    fn test_placed_robot_has_summoning_sickness() {
        let mut state = new_state();
        let bot = place(
            &mut state,
            PlayerColor::Orange,
            CardDefinition::robot("Bot", 1, 1, 1, 1),
            HexId::new(0, 0),
        );
        let tower = place(
            &mut state,
            PlayerColor::Orange,
            CardDefinition::structure("Tower", 1, 3),
            HexId::new(1, 0),
        );

        let bot = state.object(bot).unwrap();
        assert!(bot.cant_move && bot.cant_attack && bot.cant_activate);
        assert!(!state.object(tower).unwrap().cant_activate);
    }

    #[test]
    fn test_destroy_moves_card_to_discard() {
        let mut state = new_state();
        place(
            &mut state,
            PlayerColor::Orange,
            CardDefinition::kernel("Kernel", 20),
            HexId::new(-3, 0),
        );
        place(
            &mut state,
            PlayerColor::Blue,
            CardDefinition::kernel("Kernel", 20),
            HexId::new(3, 0),
        );
        state.started = true;
        let bot = place(
            &mut state,
            PlayerColor::Blue,
            CardDefinition::robot("Bot", 1, 1, 1, 1),
            HexId::new(0, 0),
        );

        destroy_object(&mut state, bot, CAUSE_EFFECT).unwrap();

        assert!(state.object(bot).is_none());
        assert_eq!(state.player(PlayerColor::Blue).discard_pile.len(), 1);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_removing_kernel_ends_game() {
        let mut state = new_state();
        let orange = place(
            &mut state,
            PlayerColor::Orange,
            CardDefinition::kernel("Kernel", 20),
            HexId::new(-3, 0),
        );
        place(
            &mut state,
            PlayerColor::Blue,
            CardDefinition::kernel("Kernel", 20),
            HexId::new(3, 0),
        );
        state.started = true;

        destroy_object(&mut state, orange, CAUSE_COMBAT).unwrap();

        assert_eq!(state.winner, Some(crate::core::Winner::Player(PlayerColor::Blue)));
        assert!(state.player(PlayerColor::Orange).discard_pile.is_empty());
    }

    #[test]
    fn test_simultaneous_damage_kills_both() {
        let mut state = new_state();
        let a = place(
            &mut state,
            PlayerColor::Orange,
            CardDefinition::robot("A", 1, 2, 2, 1),
            HexId::new(0, 0),
        );
        let b = place(
            &mut state,
            PlayerColor::Blue,
            CardDefinition::robot("B", 1, 2, 2, 1),
            HexId::new(1, 0),
        );

        damage_objects(&mut state, &[(b, 2), (a, 2)], CAUSE_COMBAT).unwrap();

        assert!(state.object(a).is_none());
        assert!(state.object(b).is_none());
        assert_eq!(state.player(PlayerColor::Orange).discard_pile.len(), 1);
        assert_eq!(state.player(PlayerColor::Blue).discard_pile.len(), 1);
    }

    #[test]
    fn test_return_to_hand_resets_cost() {
        let mut state = new_state();
        let bot = place(
            &mut state,
            PlayerColor::Orange,
            CardDefinition::robot("Bot", 3, 1, 1, 1),
            HexId::new(0, 0),
        );
        state.object_mut(bot).unwrap().card.cost = 0;

        remove_object(&mut state, bot, Destination::Hand).unwrap();

        let hand = &state.player(PlayerColor::Orange).hand;
        assert_eq!(hand.len(), 1);
        assert_eq!(hand[0].cost, 3);
    }
}
