//! Benchmarks for the hot paths of a match: ability reconciliation,
//! speculative state clones, and whole turns of play.

#![allow(missing_docs)]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use hexbots::cards::{CardDefinition, CardRegistry};
use hexbots::core::{GameAction, PlayerColor, PlayerMap};
use hexbots::formats::{Format, GameSetup, NormalFormat};
use hexbots::hex::HexId;
use hexbots::{apply_action, GameState};

fn registry() -> Arc<CardRegistry> {
    let mut registry = CardRegistry::new();
    let cards = [
        CardDefinition::robot("Attack Bot", 1, 1, 1, 1),
        CardDefinition::robot("Runner", 2, 2, 1, 2),
        CardDefinition::structure("Beacon", 2, 3).with_ability(
            "setAbility(abilities.attributeAdjustment(\
             () => objectsMatchingConditions('robot', [conditions.controlledBy(targets.self())]), \
             'attack', (x) => x + 1))",
        ),
    ];
    for card in cards {
        registry.register(card).expect("valid card");
    }
    Arc::new(registry)
}

fn opening() -> GameState {
    let registry = registry();
    let cards: Vec<_> = registry.iter().cloned().collect();
    let deck: Vec<_> = cards.iter().cycle().take(30).cloned().collect();
    let decks = PlayerMap::new(|_| deck.clone());
    let usernames = PlayerMap::new(|c| c.name().to_string());
    NormalFormat
        .start_game(GameSetup::new(registry, usernames, decks, 42))
        .expect("valid setup")
}

/// A board with several auras and robots for reconciliation to chew on.
fn crowded() -> GameState {
    let mut state = opening();
    let beacon = state.registry.by_name("Beacon").cloned().expect("beacon");
    let bot = state.registry.by_name("Attack Bot").cloned().expect("bot");
    let spots = [
        (PlayerColor::Orange, HexId::new(-2, 0), &beacon),
        (PlayerColor::Orange, HexId::new(-2, 1), &bot),
        (PlayerColor::Orange, HexId::new(-1, 0), &bot),
        (PlayerColor::Orange, HexId::new(-1, 1), &beacon),
        (PlayerColor::Blue, HexId::new(2, 0), &beacon),
        (PlayerColor::Blue, HexId::new(2, -1), &bot),
        (PlayerColor::Blue, HexId::new(1, 0), &bot),
    ];
    for (color, hex, card) in spots {
        let instance = state.new_card((*card).clone());
        hexbots::effects::place_object(&mut state, color, instance, hex).expect("placement");
    }
    state
}

fn bench_reconcile(c: &mut Criterion) {
    let state = crowded();
    c.bench_function("apply_abilities_crowded", |b| {
        b.iter(|| {
            let mut state = state.clone();
            hexbots::triggers::apply_abilities(&mut state).expect("reconcile");
            black_box(state)
        });
    });
}

fn bench_state_clone(c: &mut Criterion) {
    let state = crowded();
    c.bench_function("speculative_clone", |b| b.iter(|| black_box(state.clone())));
}

fn bench_turns(c: &mut Criterion) {
    let state = opening();
    c.bench_function("twenty_turns_place_and_pass", |b| {
        b.iter(|| {
            let mut state = state.clone();
            for _ in 0..20 {
                let me = state.current_turn;
                let hexes =
                    hexbots::rules::valid_placement_hexes(&state, me, hexbots::CardType::Robot);
                if let Some(&hex) = hexes.first() {
                    let _ = apply_action(&mut state, &GameAction::PlaceCard { card_index: 0, hex });
                }
                let _ = apply_action(&mut state, &GameAction::PassTurn { player: me });
            }
            black_box(state)
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let state = crowded();
    c.bench_function("snapshot_roundtrip", |b| {
        b.iter(|| {
            let bytes = state.to_bytes().expect("encode");
            black_box(GameState::from_bytes(&bytes).expect("decode"))
        });
    });
}

criterion_group!(benches, bench_reconcile, bench_state_clone, bench_turns, bench_snapshot);
criterion_main!(benches);
