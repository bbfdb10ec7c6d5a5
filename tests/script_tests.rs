//! Effect programs evaluated against live matches: target queries,
//! control flow, seeded randomness and pure attribute evaluation.

mod common;

use common::*;
use hexbots::cards::{Attribute, CardDefinition};
use hexbots::hex::HexId;
use hexbots::script::{self, Frame, Program, Value};
use hexbots::targeting::Collection;
use hexbots::{GameState, ScriptError, ScriptResult};

fn run(state: &mut GameState, source: &str, frame: Frame) -> ScriptResult<Value> {
    let program = Program::compile(source)?;
    script::execute(state, &program, frame)
}

fn as_orange(state: &mut GameState, source: &str) -> Value {
    run(state, source, Frame::for_player(ORANGE)).unwrap()
}

fn hexes_of(state: &GameState, value: Value) -> Vec<HexId> {
    match value.into_collection().unwrap() {
        Collection::Objects(ids) => ids.iter().map(|id| state.locate(*id).unwrap().1).collect(),
        other => panic!("expected objects, got {other:?}"),
    }
}

/// Orange bot at the origin facing three blue robots at increasing range.
fn skirmish() -> (GameState, hexbots::EntityId) {
    let mut state = empty_match(0);
    let hero = put_object(
        &mut state,
        ORANGE,
        HexId::new(0, 0),
        CardDefinition::robot("Hero", 1, 2, 3, 1),
    );
    put_object(&mut state, BLUE, HexId::new(1, 0), CardDefinition::robot("Near", 1, 1, 1, 1));
    put_object(&mut state, BLUE, HexId::new(0, -2), CardDefinition::robot("Mid", 1, 1, 5, 1));
    put_object(&mut state, BLUE, HexId::new(-3, 3), CardDefinition::robot("Far", 1, 4, 2, 1));
    (state, hero)
}

#[test]
fn test_objects_come_back_in_hex_order() {
    let (mut state, _) = skirmish();
    let value = as_orange(&mut state, "objectsMatchingConditions('robot', [])");
    let hexes = hexes_of(&state, value);

    let mut sorted = hexes.clone();
    sorted.sort();
    assert_eq!(hexes, sorted);
    assert_eq!(hexes.len(), 4);
}

#[test]
fn test_distance_and_control_conditions() {
    let (mut state, hero) = skirmish();
    let value = run(
        &mut state,
        "objectsMatchingConditions(['robot', 'kernel'], [\
         conditions.controlledBy(targets.opponent()), \
         conditions.withinDistanceOf(2, targets.thisObject())])",
        Frame::for_object(ORANGE, hero),
    )
    .unwrap();
    assert_eq!(hexes_of(&state, value), vec![HexId::new(0, -2), HexId::new(1, 0)]);

    // The origin is never within distance of itself.
    let value = run(
        &mut state,
        "objectsMatchingConditions('robot', [conditions.withinDistanceOf(1, \
         targets.thisObject())])",
        Frame::for_object(ORANGE, hero),
    )
    .unwrap();
    assert_eq!(hexes_of(&state, value), vec![HexId::new(1, 0)]);

    let value = run(
        &mut state,
        "objectsMatchingConditions('robot', [conditions.exactDistanceFrom(3, \
         targets.thisObject())])",
        Frame::for_object(ORANGE, hero),
    )
    .unwrap();
    assert_eq!(hexes_of(&state, value), vec![HexId::new(-3, 3)]);
}

#[test]
fn test_attribute_comparison_reads_current_values() {
    let (mut state, _) = skirmish();
    let value = as_orange(
        &mut state,
        "objectsMatchingConditions('allobjects', \
         [conditions.attributeComparison('health', (h) => h >= 5)])",
    );
    // Both kernels and the five-health robot.
    assert_eq!(hexes_of(&state, value).len(), 3);

    let value = as_orange(
        &mut state,
        "objectsMatchingConditions('robot', \
         [conditions.attributeComparison('attack', (a) => a > 3)])",
    );
    assert_eq!(hexes_of(&state, value), vec![HexId::new(-3, 3)]);
}

#[test]
fn test_tiles_next_to_a_player_are_next_to_its_kernel() {
    let mut state = empty_match(0);
    let value = as_orange(
        &mut state,
        "count(tilesMatchingConditions([conditions.adjacentTo(targets.opponent()), \
         conditions.unoccupied()]))",
    );
    assert_eq!(value, Value::Int(3));

    put_object(&mut state, ORANGE, HexId::new(2, 0), CardDefinition::robot("Squatter", 1, 1, 1, 1));
    let value = as_orange(
        &mut state,
        "count(tilesMatchingConditions([conditions.adjacentTo(targets.opponent()), \
         conditions.unoccupied()]))",
    );
    assert_eq!(value, Value::Int(2));
}

#[test]
fn test_card_queries_and_aggregates() {
    let mut state = empty_match(4);
    give_card(&mut state, ORANGE, CardDefinition::robot("Cheap", 1, 1, 1, 1));
    give_card(&mut state, ORANGE, CardDefinition::robot("Pricey", 5, 3, 3, 1));
    give_card(&mut state, ORANGE, CardDefinition::event("Spark", 2));
    give_card(&mut state, BLUE, CardDefinition::event("Other", 0));

    let value = as_orange(
        &mut state,
        "count(cardsInHand(targets.self(), 'anycard', \
         [conditions.attributeComparison('cost', (c) => c <= 2)]))",
    );
    assert_eq!(value, Value::Int(2));

    let value = as_orange(&mut state, "count(cardsInHand(targets.allPlayers(), 'event'))");
    assert_eq!(value, Value::Int(2));

    let value = as_orange(
        &mut state,
        "attributeSum(cardsInHand(targets.self(), 'robot'), 'attack')",
    );
    assert_eq!(value, Value::Int(4));

    let value = as_orange(
        &mut state,
        "attributeSum(objectsMatchingConditions('kernel', []), 'health')",
    );
    assert_eq!(value, Value::Int(40));

    let value = as_orange(
        &mut state,
        "energyAmount(targets.self()) + energyAmount(targets.opponent())",
    );
    assert_eq!(value, Value::Int(4));
}

#[test]
fn test_for_each_binds_single_entries() {
    let (mut state, _) = skirmish();
    as_orange(
        &mut state,
        "actions.forEach(objectsMatchingConditions('robot', \
         [conditions.controlledBy(targets.opponent())]), \
         (bot) => actions.dealDamage(bot, attributeValue(bot, 'health') - 1))",
    );
    let survivors = as_orange(
        &mut state,
        "objectsMatchingConditions('robot', \
         [conditions.attributeComparison('health', (h) => h == 1)])",
    );
    assert_eq!(hexes_of(&state, survivors).len(), 3);
}

#[test]
fn test_if_then_else_picks_a_branch() {
    let mut state = empty_match(1);
    let source = "actions.ifThenElse(count(cardsInHand(targets.self(), 'anycard')) > 0, \
                  () => actions.modifyEnergy(targets.self(), (e) => e + 1), \
                  () => actions.modifyEnergy(targets.self(), (e) => e + 5))";

    as_orange(&mut state, source);
    assert_eq!(state.player(ORANGE).energy.available, 6);

    give_card(&mut state, ORANGE, CardDefinition::event("Spark", 1));
    as_orange(&mut state, source);
    assert_eq!(state.player(ORANGE).energy.available, 7);
}

#[test]
fn test_random_is_reproducible_from_state() {
    let (state, _) = skirmish();
    let source = "targets.random(2, objectsMatchingConditions('robot', []))";

    let mut a = state.clone();
    let mut b = state.clone();
    let first = as_orange(&mut a, source);
    let second = as_orange(&mut b, source);
    assert_eq!(first, second);
    assert_eq!(a.rng.state(), b.rng.state());
    assert_ne!(a.rng.state(), state.rng.state());

    let hexes = hexes_of(&a, first);
    assert_eq!(hexes.len(), 2);
    assert!(hexes[0] < hexes[1]);
}

#[test]
fn test_uncontested_choose_is_random() {
    let (state, _) = skirmish();
    let mut a = state.clone();
    let mut b = state;
    let source = "targets.choose(objectsMatchingConditions('robot', \
                  [conditions.controlledBy(targets.opponent())]))";

    let first = as_orange(&mut a, source);
    let second = as_orange(&mut b, source);
    assert_eq!(first, second);
    assert_eq!(first.into_collection().unwrap().len(), 1);
    assert!(!a.player(ORANGE).target.choosing);
}

#[test]
fn test_adjustments_cannot_change_state() {
    let mut state = empty_match(0);
    let closure = as_orange(&mut state, "(x) => actions.draw(targets.self(), 1)")
        .into_closure()
        .unwrap();
    assert_eq!(
        script::eval_adjustment(&state, &closure, 1),
        Err(ScriptError::ImpureContext("actions.draw"))
    );

    let source = "(x) => x * 2 + count(objectsMatchingConditions('kernel', []))";
    let closure = as_orange(&mut state, source)
        .into_closure()
        .unwrap();
    assert_eq!(script::eval_adjustment(&state, &closure, 3), Ok(8));
}

#[test]
fn test_failing_adjustment_is_skipped() {
    let mut state = empty_match(0);
    let bot = put_object(
        &mut state,
        ORANGE,
        HexId::new(0, 0),
        CardDefinition::robot("Glitch", 1, 2, 2, 1).with_ability(
            "setAbility(abilities.attributeAdjustment(() => targets.thisObject(), 'attack', \
             (x) => count(targets.choose(allTiles()))))",
        ),
    );
    assert_eq!(state.attribute(bot, Attribute::Attack), Some(2));
}

#[test]
fn test_runtime_errors() {
    let mut state = empty_match(0);
    assert_eq!(run(&mut state, "7 / 0", Frame::for_player(ORANGE)), Ok(Value::Int(0)));
    assert!(matches!(
        run(
            &mut state,
            "objectsMatchingConditions('robot', [conditions.controlledBy(allTiles())])",
            Frame::for_player(ORANGE)
        ),
        Err(ScriptError::TargetKindMismatch { .. })
    ));
    assert_eq!(
        run(&mut state, "objectsMatchingConditions('wizard', [])", Frame::for_player(ORANGE)),
        Err(ScriptError::UnknownCardType("wizard".to_string()))
    );
    assert!(matches!(
        run(&mut state, "count(1)", Frame::for_player(ORANGE)),
        Err(ScriptError::TypeMismatch { .. })
    ));
}

#[test]
fn test_this_object_is_empty_without_an_object() {
    let mut state = empty_match(0);
    let value = as_orange(&mut state, "count(targets.thisObject())");
    assert_eq!(value, Value::Int(0));
}
