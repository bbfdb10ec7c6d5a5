//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use hexbots::cards::{CardDefinition, CardRegistry};
use hexbots::core::{Energy, EntityId, GameConfig, GameState, PlayerColor, PlayerMap};
use hexbots::effects::place_object;
use hexbots::hex::HexId;
use hexbots::rules;

pub const ORANGE: PlayerColor = PlayerColor::Orange;
pub const BLUE: PlayerColor = PlayerColor::Blue;

pub fn usernames() -> PlayerMap<String> {
    PlayerMap::new(|c| c.name().to_string())
}

/// A registry holding `cards`, panicking on any invalid program.
pub fn registry(cards: Vec<CardDefinition>) -> Arc<CardRegistry> {
    let mut registry = CardRegistry::new();
    for card in cards {
        registry.register(card).unwrap();
    }
    Arc::new(registry)
}

/// A started match with both kernels placed, no cards anywhere, and
/// orange to move with `energy` available.
pub fn match_with_registry(registry: Arc<CardRegistry>, energy: i64) -> GameState {
    let mut state = GameState::new(GameConfig::default(), registry, usernames(), 42);
    for color in PlayerColor::ALL {
        let hex = state.config.kernel_hex(color);
        let kernel = state.new_card(Arc::new(CardDefinition::kernel("Kernel", 20)));
        place_object(&mut state, color, kernel, hex).unwrap();
    }
    state.started = true;
    rules::start_turn(&mut state, ORANGE, false).unwrap();
    state.player_mut(ORANGE).energy = Energy {
        available: energy,
        total: energy,
    };
    state
}

pub fn empty_match(energy: i64) -> GameState {
    match_with_registry(Arc::new(CardRegistry::new()), energy)
}

/// Put a card into `color`'s hand, returning its instance ID.
pub fn give_card(state: &mut GameState, color: PlayerColor, card: CardDefinition) -> EntityId {
    let instance = state.new_card(Arc::new(card));
    let id = instance.id;
    state.player_mut(color).hand.push_back(instance);
    id
}

/// Place an object that is ready to act this turn.
pub fn put_object(
    state: &mut GameState,
    color: PlayerColor,
    hex: HexId,
    card: CardDefinition,
) -> EntityId {
    let instance = state.new_card(Arc::new(card));
    let id = place_object(state, color, instance, hex).unwrap();
    state.object_mut(id).unwrap().reset_turn_flags();
    id
}

/// Pass turns until it is `color`'s turn again.
pub fn pass_to(state: &mut GameState, color: PlayerColor) {
    loop {
        let current = state.current_turn;
        rules::pass_turn(state, current).unwrap();
        if state.current_turn == color {
            break;
        }
    }
}
