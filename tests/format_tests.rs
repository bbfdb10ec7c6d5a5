//! Match setup for each format.

mod common;

use std::sync::Arc;

use common::*;
use hexbots::cards::{Attribute, CardDefinition, CardRegistry, CardType};
use hexbots::core::{GameAction, GameConfig, PlayerMap};
use hexbots::formats::{
    format_by_name, DraftFormat, Format, GameSetup, NormalFormat, SharedDeckFormat,
};
use hexbots::GameError;

fn bot_registry() -> Arc<CardRegistry> {
    registry(vec![
        CardDefinition::robot("Attack Bot", 1, 1, 1, 1),
        CardDefinition::robot("Tank Bot", 3, 1, 4, 1),
        CardDefinition::event("Shock", 1).with_command("actions.dealDamage(targets.opponent(), 1)"),
    ])
}

fn deck_of(registry: &CardRegistry, name: &str, size: usize) -> Vec<Arc<CardDefinition>> {
    let card = registry.by_name(name).unwrap().clone();
    vec![card; size]
}

fn deck_ids(state: &hexbots::GameState, color: hexbots::PlayerColor) -> Vec<hexbots::EntityId> {
    state.player(color).deck.iter().map(|c| c.id).collect()
}

fn setup(size: usize) -> GameSetup {
    let registry = bot_registry();
    let decks = PlayerMap::new(|_| deck_of(&registry, "Attack Bot", size));
    GameSetup::new(registry, usernames(), decks, 9)
}

#[test]
fn test_normal_format_deals_hands() {
    let state = NormalFormat.start_game(setup(30)).unwrap();

    assert!(state.started);
    assert_eq!(state.current_turn, ORANGE);
    assert_eq!(state.turn_number, 1);
    for color in [ORANGE, BLUE] {
        assert_eq!(state.player(color).hand.len(), 2);
        assert_eq!(state.player(color).deck.len(), 28);
        let (hex, kernel) = state.kernel(color).unwrap();
        assert_eq!(hex, state.config.kernel_hex(color));
        assert_eq!(state.attribute(kernel, Attribute::Health), Some(20));
    }
    assert_eq!(state.player(ORANGE).energy.available, 1);
    assert_eq!(state.player(BLUE).energy.total, 0);
    assert!(!state.shared_deck);
}

#[test]
fn test_registry_kernel_is_used() {
    let registry = registry(vec![
        CardDefinition::robot("Attack Bot", 1, 1, 1, 1),
        CardDefinition::kernel("Mainframe", 25),
    ]);
    let decks = PlayerMap::new(|_| deck_of(&registry, "Attack Bot", 30));
    let state = NormalFormat
        .start_game(GameSetup::new(registry, usernames(), decks, 1))
        .unwrap();

    let (_, kernel) = state.kernel(BLUE).unwrap();
    assert_eq!(state.object(kernel).unwrap().name(), "Mainframe");
    assert_eq!(state.attribute(kernel, Attribute::Health), Some(25));
}

#[test]
fn test_short_deck_is_rejected() {
    let err = NormalFormat.start_game(setup(29)).unwrap_err();
    assert!(matches!(err, GameError::InvalidDeck(_)));

    let err = SharedDeckFormat.start_game(setup(31)).unwrap_err();
    assert!(matches!(err, GameError::InvalidDeck(_)));
}

#[test]
fn test_kernel_in_deck_is_rejected() {
    let kernel = Arc::new(CardDefinition::kernel("Spare Kernel", 20));
    let mut deck = deck_of(&bot_registry(), "Attack Bot", 29);
    deck.push(kernel);
    assert!(!NormalFormat.is_deck_valid(&deck, &GameConfig::default()));
    assert!(DraftFormat.is_deck_valid(&deck, &GameConfig::default()));
}

#[test]
fn test_shared_deck_is_common() {
    let mut state = SharedDeckFormat.start_game(setup(30)).unwrap();

    assert!(state.shared_deck);
    assert_eq!(state.player(ORANGE).hand.len(), 2);
    assert_eq!(state.player(BLUE).hand.len(), 2);
    assert_eq!(state.player(ORANGE).deck.len(), 56);
    assert_eq!(deck_ids(&state, ORANGE), deck_ids(&state, BLUE));

    hexbots::apply_action(&mut state, &GameAction::PassTurn { player: ORANGE }).unwrap();
    assert_eq!(state.player(BLUE).hand.len(), 3);
    assert_eq!(state.player(ORANGE).deck.len(), 55);
    assert_eq!(deck_ids(&state, ORANGE), deck_ids(&state, BLUE));
}

#[test]
fn test_draft_builds_decks_then_starts() {
    let registry = bot_registry();
    let config = GameConfig::default().with_deck_size(3).with_draft_pack_size(2);
    let mut state = DraftFormat
        .start_game(
            GameSetup::new(registry, usernames(), PlayerMap::default(), 5).with_config(config),
        )
        .unwrap();

    assert!(!state.started);
    let draft = state.draft.as_ref().unwrap();
    assert_eq!(draft.picker, ORANGE);
    assert_eq!(draft.packs[ORANGE].len(), 2);
    assert!(draft.pool.iter().all(|c| c.card_type != CardType::Kernel));

    // Play actions and out-of-turn picks are ignored while drafting.
    hexbots::apply_action(&mut state, &GameAction::PassTurn { player: ORANGE }).unwrap();
    hexbots::apply_action(&mut state, &GameAction::DraftPick { player: BLUE, index: 0 }).unwrap();
    assert!(state.draft.as_ref().unwrap().picked[BLUE].is_empty());

    for round in 0..6 {
        let picker = if round % 2 == 0 { ORANGE } else { BLUE };
        assert_eq!(state.draft.as_ref().unwrap().picker, picker);
        let pick = GameAction::DraftPick { player: picker, index: 1 };
        hexbots::apply_action(&mut state, &pick).unwrap();
    }

    assert!(state.draft.is_none());
    assert!(state.started);
    assert_eq!(state.current_turn, ORANGE);
    for color in [ORANGE, BLUE] {
        assert_eq!(state.player(color).hand.len(), 2);
        assert_eq!(state.player(color).deck.len(), 1);
        assert!(state.kernel(color).is_some());
    }
}

#[test]
fn test_draft_needs_a_pool() {
    let registry = registry(vec![CardDefinition::kernel("Mainframe", 25)]);
    let err = DraftFormat
        .start_game(GameSetup::new(registry, usernames(), PlayerMap::default(), 5))
        .unwrap_err();
    assert!(matches!(err, GameError::Format(_)));
}

#[test]
fn test_same_seed_same_opening() {
    let a = NormalFormat.start_game(setup(30)).unwrap();
    let b = NormalFormat.start_game(setup(30)).unwrap();
    let names = |state: &hexbots::GameState| -> Vec<String> {
        state.player(ORANGE).deck.iter().map(|c| c.name().to_string()).collect()
    };
    assert_eq!(names(&a), names(&b));
    assert_eq!(a.rng.state(), b.rng.state());
}

#[test]
fn test_formats_by_name() {
    for name in ["normal", "sharedDeck", "draft"] {
        assert_eq!(format_by_name(name).unwrap().name(), name);
    }
    assert!(format_by_name("sealed").is_none());
}
