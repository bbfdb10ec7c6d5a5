//! Passive, triggered and activated abilities.

mod common;

use common::*;
use hexbots::cards::{Attribute, CardDefinition, CardType};
use hexbots::core::{EffectKind, GameAction};
use hexbots::hex::HexId;
use hexbots::rules::{self, apply_action};

fn taunt_bot() -> CardDefinition {
    CardDefinition::robot("Tank Bot", 3, 1, 4, 1)
        .with_ability("setAbility(abilities.applyEffect(() => targets.thisObject(), 'taunt'))")
}

fn banner() -> CardDefinition {
    CardDefinition::structure("Banner", 2, 3).with_ability(
        "setAbility(abilities.attributeAdjustment(\
         () => objectsMatchingConditions('robot', [conditions.controlledBy(targets.self())]), \
         'attack', (x) => x + 1))",
    )
}

fn discount_tower() -> CardDefinition {
    CardDefinition::structure("Discount Tower", 2, 2).with_ability(
        "setAbility(abilities.attributeAdjustment(() => cardsInHand(targets.self(), 'robot'), \
         'cost', (x) => x - 1))",
    )
}

#[test]
fn test_taunt_limits_attack_targets() {
    let mut state = empty_match(0);
    put_object(&mut state, ORANGE, HexId::new(0, 0), CardDefinition::robot("Striker", 1, 2, 2, 0));
    put_object(&mut state, BLUE, HexId::new(1, 0), CardDefinition::robot("Plain", 1, 1, 1, 1));
    let tank = put_object(&mut state, BLUE, HexId::new(0, 1), taunt_bot());

    assert!(state.object(tank).unwrap().has_effect(EffectKind::Taunt));
    assert_eq!(rules::valid_attack_hexes(&state, HexId::new(0, 0)), vec![HexId::new(0, 1)]);
}

#[test]
fn test_aura_follows_board() {
    let mut state = empty_match(0);
    let bot = put_object(
        &mut state,
        ORANGE,
        HexId::new(-1, 0),
        CardDefinition::robot("Bot", 1, 1, 2, 1),
    );
    let enemy = put_object(
        &mut state,
        BLUE,
        HexId::new(2, 0),
        CardDefinition::robot("Enemy", 1, 1, 2, 1),
    );
    let banner = put_object(&mut state, ORANGE, HexId::new(-2, 1), banner());

    assert_eq!(state.attribute(bot, Attribute::Attack), Some(2));
    assert_eq!(state.attribute(enemy, Attribute::Attack), Some(1));

    // A robot arriving later is picked up by the next reconciliation.
    let late = put_object(
        &mut state,
        ORANGE,
        HexId::new(-2, 0),
        CardDefinition::robot("Late", 1, 3, 1, 1),
    );
    assert_eq!(state.attribute(late, Attribute::Attack), Some(4));

    let ability = &state.object(banner).unwrap().abilities[0];
    let mut targets = ability.current_targets.clone();
    targets.sort();
    let mut expected = vec![bot, late];
    expected.sort();
    assert_eq!(targets, expected);

    hexbots::effects::destroy(&mut state, &[banner]).unwrap();
    assert_eq!(state.attribute(bot, Attribute::Attack), Some(1));
    assert_eq!(state.attribute(late, Attribute::Attack), Some(3));
    assert!(state.object(bot).unwrap().adjustments.is_empty());
}

#[test]
fn test_cost_reductions_stack_and_clamp_at_zero() {
    let mut state = empty_match(0);
    let cheap = give_card(&mut state, ORANGE, CardDefinition::robot("Cheap", 1, 1, 1, 1));
    let pricey = give_card(&mut state, ORANGE, CardDefinition::robot("Pricey", 3, 1, 1, 1));
    let event = give_card(&mut state, ORANGE, CardDefinition::event("Spark", 2));

    put_object(&mut state, ORANGE, HexId::new(-2, 0), discount_tower());
    put_object(&mut state, ORANGE, HexId::new(-2, 1), discount_tower());

    let cost = |state: &hexbots::GameState, id| state.card_cost(state.card(id).unwrap());
    assert_eq!(cost(&state, cheap), 0);
    assert_eq!(cost(&state, pricey), 1);
    assert_eq!(cost(&state, event), 2);

    // Newly drawn robots are discounted too.
    let drawn = state.new_card(std::sync::Arc::new(CardDefinition::robot("Drawn", 4, 1, 1, 1)));
    let drawn_id = drawn.id;
    state.player_mut(ORANGE).deck.push_back(drawn);
    state.draw_cards(ORANGE, 1);
    hexbots::triggers::apply_abilities(&mut state).unwrap();
    assert_eq!(cost(&state, drawn_id), 2);
}

#[test]
fn test_discounted_card_can_be_afforded() {
    let mut state = empty_match(1);
    put_object(&mut state, ORANGE, HexId::new(-2, 1), discount_tower());
    give_card(&mut state, ORANGE, CardDefinition::robot("Pricey", 2, 1, 1, 1));
    let hex = rules::valid_placement_hexes(&state, ORANGE, CardType::Robot)[0];

    apply_action(&mut state, &GameAction::PlaceCard { card_index: 0, hex }).unwrap();

    let (_, placed) = state.object_at(hex).unwrap();
    assert_eq!(placed.name(), "Pricey");
    assert_eq!(state.player(ORANGE).energy.available, 0);
    // On the board the card is no longer in hand, so the discount is gone.
    assert_eq!(state.attribute(placed.id, Attribute::Cost), Some(2));
}

#[test]
fn test_activated_ability_exhausts_object() {
    let mut state = empty_match(0);
    for _ in 0..2 {
        let card = state.new_card(std::sync::Arc::new(CardDefinition::event("Filler", 1)));
        state.player_mut(ORANGE).deck.push_back(card);
    }
    let hex = HexId::new(-2, 0);
    put_object(
        &mut state,
        ORANGE,
        hex,
        CardDefinition::robot("Scholar", 2, 1, 2, 1)
            .with_ability(
                "setAbility(abilities.activated(() => actions.draw(targets.self(), 1), \
                 'Draw a card'))",
            ),
    );
    assert!(rules::can_activate(&state, hex));

    apply_action(&mut state, &GameAction::ActivateAbility { hex, index: 0 }).unwrap();
    assert_eq!(state.player(ORANGE).hand.len(), 1);
    assert!(!rules::can_activate(&state, hex));
    assert!(rules::valid_movement_hexes(&state, hex).is_empty());

    apply_action(&mut state, &GameAction::ActivateAbility { hex, index: 0 }).unwrap();
    assert_eq!(state.player(ORANGE).hand.len(), 1);
}

#[test]
fn test_override_replaces_combat_damage() {
    let mut state = empty_match(0);
    let pacifist = put_object(
        &mut state,
        ORANGE,
        HexId::new(0, 0),
        CardDefinition::robot("Pacifist", 1, 5, 3, 1).with_ability(
            "setTrigger(triggers.afterAttack(() => targets.thisObject()), \
             () => actions.draw(targets.self(), 1), true)",
        ),
    );
    let target = put_object(
        &mut state,
        BLUE,
        HexId::new(1, 0),
        CardDefinition::robot("Target", 1, 1, 1, 1),
    );
    let card = state.new_card(std::sync::Arc::new(CardDefinition::event("Filler", 1)));
    state.player_mut(ORANGE).deck.push_back(card);

    apply_action(
        &mut state,
        &GameAction::Attack {
            from: HexId::new(0, 0),
            to: HexId::new(1, 0),
        },
    )
    .unwrap();
    apply_action(&mut state, &GameAction::ResolveAttack).unwrap();

    assert!(state.object(target).is_some());
    assert_eq!(state.attribute(pacifist, Attribute::Health), Some(3));
    assert_eq!(state.player(ORANGE).hand.len(), 1);
    assert!(state.object(pacifist).unwrap().attacked_this_turn);
}

#[test]
fn test_destroyed_trigger_sees_combat_cause() {
    let mut state = empty_match(0);
    put_object(&mut state, ORANGE, HexId::new(0, 0), CardDefinition::robot("Attacker", 1, 2, 2, 1));
    put_object(
        &mut state,
        BLUE,
        HexId::new(1, 0),
        CardDefinition::robot("Martyr", 1, 2, 2, 1).with_ability(
            "setTrigger(triggers.afterDestroyed(() => targets.thisObject(), 'combat'), \
             () => actions.dealDamage(targets.opponent(), 3))",
        ),
    );

    apply_action(
        &mut state,
        &GameAction::Attack {
            from: HexId::new(0, 0),
            to: HexId::new(1, 0),
        },
    )
    .unwrap();
    apply_action(&mut state, &GameAction::ResolveAttack).unwrap();

    let (_, kernel) = state.kernel(ORANGE).unwrap();
    assert_eq!(state.attribute(kernel, Attribute::Health), Some(17));
}

#[test]
fn test_temporary_buff_expires() {
    let mut state = empty_match(1);
    let bot = put_object(
        &mut state,
        ORANGE,
        HexId::new(-2, 0),
        CardDefinition::robot("Bot", 1, 1, 2, 1),
    );
    give_card(
        &mut state,
        ORANGE,
        CardDefinition::event("Rally", 1).with_command(
            "save('duration', 1); \
             actions.modifyAttribute(objectsMatchingConditions('robot', \
             [conditions.controlledBy(targets.self())]), 'attack', (x) => x + 2)",
        ),
    );

    apply_action(&mut state, &GameAction::PlayEvent { card_index: 0 }).unwrap();
    assert_eq!(state.attribute(bot, Attribute::Attack), Some(3));

    apply_action(&mut state, &GameAction::PassTurn { player: ORANGE }).unwrap();
    assert_eq!(state.attribute(bot, Attribute::Attack), Some(1));
    assert!(state.object(bot).unwrap().abilities.is_empty());
}

#[test]
fn test_give_ability_is_removed_with_source() {
    let mut state = empty_match(0);
    let bot = put_object(
        &mut state,
        ORANGE,
        HexId::new(-2, 0),
        CardDefinition::robot("Bot", 1, 1, 2, 1),
    );
    let commander = put_object(
        &mut state,
        ORANGE,
        HexId::new(-2, 1),
        CardDefinition::structure("Commander", 2, 3).with_ability(
            "setAbility(abilities.giveAbility(\
             () => objectsMatchingConditions('robot', [conditions.controlledBy(targets.self())]), \
             \"setAbility(abilities.applyEffect(() => targets.thisObject(), 'taunt'))\"))",
        ),
    );

    assert!(state.object(bot).unwrap().has_effect(EffectKind::Taunt));

    hexbots::effects::destroy(&mut state, &[commander]).unwrap();
    let bot = state.object(bot).unwrap();
    assert!(!bot.has_effect(EffectKind::Taunt));
    assert!(bot.abilities.is_empty());
}
