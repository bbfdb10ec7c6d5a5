//! Playing cards from hand and activating abilities on the board.

use crate::cards::CardType;
use crate::core::{EffectKind, EntityId, GameState, PlayerColor, TriggerKind};
use crate::effects::{self, abilities::owner_frame, place_object};
use crate::error::ScriptResult;
use crate::hex::HexId;
use crate::script::{self, Frame, Program};
use crate::triggers::{self, GameEvent};

/// Hexes where `player` may place a card of `card_type`, in hex order.
///
/// Robots go next to their controller's kernel; structures next to any
/// friendly object. Only unoccupied hexes qualify.
#[must_use]
pub fn valid_placement_hexes(
    state: &GameState,
    player: PlayerColor,
    card_type: CardType,
) -> Vec<HexId> {
    let grid = state.config.grid();
    let anchors: Vec<HexId> = match card_type {
        CardType::Robot => state.kernel(player).map(|(hex, _)| hex).into_iter().collect(),
        CardType::Structure => state.player(player).board.keys().copied().collect(),
        CardType::Event | CardType::Kernel => return Vec::new(),
    };
    let mut hexes: Vec<HexId> = anchors
        .into_iter()
        .flat_map(|anchor| grid.adjacent(anchor))
        .filter(|hex| !state.is_occupied(*hex))
        .collect();
    hexes.sort();
    hexes.dedup();
    hexes
}

/// Type and current cost of a card in `player`'s hand.
fn hand_card(
    state: &GameState,
    player: PlayerColor,
    card: EntityId,
) -> Option<(CardType, i64, String)> {
    let instance = state.player(player).hand.iter().find(|c| c.id == card)?;
    Some((instance.card_type(), state.card_cost(instance), instance.name().to_string()))
}

/// Spend `cost` energy, or flag the action invalid when it is unaffordable.
fn pay(state: &mut GameState, player: PlayerColor, cost: i64) -> bool {
    if state.player(player).energy.available < cost {
        state.invalid = true;
        return false;
    }
    effects::pay_energy(state, &[player], cost);
    true
}

/// Place a robot or structure from hand onto `hex`.
pub fn place_card(
    state: &mut GameState,
    player: PlayerColor,
    card: EntityId,
    hex: HexId,
) -> ScriptResult<()> {
    if state.current_turn != player {
        return Ok(());
    }
    let Some((card_type, cost, name)) = hand_card(state, player, card) else {
        return Ok(());
    };
    if !card_type.is_object() || !valid_placement_hexes(state, player, card_type).contains(&hex) {
        return Ok(());
    }
    if !pay(state, player, cost) {
        return Ok(());
    }
    let Some((_, instance)) = state.take_card(card) else {
        return Ok(());
    };

    let id = place_object(state, player, instance, hex)?;
    state.log_message(Some(player), format!("{} played {name}", state.player(player).username));
    state.play_sound("spawn");

    let event = GameEvent::new(TriggerKind::AfterCardPlay)
        .with_object(id)
        .with_player(player)
        .with_tag(card_type.name());
    triggers::trigger_event(state, &event, None)
}

/// Play an event from hand: pay, run its command, discard it.
pub fn play_event(state: &mut GameState, player: PlayerColor, card: EntityId) -> ScriptResult<()> {
    if state.current_turn != player {
        return Ok(());
    }
    let Some((card_type, cost, name)) = hand_card(state, player, card) else {
        return Ok(());
    };
    if card_type != CardType::Event || !pay(state, player, cost) {
        return Ok(());
    }
    let Some((_, instance)) = state.take_card(card) else {
        return Ok(());
    };

    let definition = instance.definition.clone();
    state.player_mut(player).discard_pile.push_back(instance);
    for source in &definition.command {
        let program = Program::compile(source)?;
        script::execute(state, &program, Frame::for_player(player))?;
    }

    state.log_message(Some(player), format!("{} played {name}", state.player(player).username));
    state.play_sound("event");
    let event = GameEvent::new(TriggerKind::AfterCardPlay)
        .with_player(player)
        .with_tag(CardType::Event.name());
    triggers::trigger_event(state, &event, None)?;
    triggers::apply_abilities(state)
}

/// Whether the object at `hex` has an ability it can activate now.
#[must_use]
pub fn can_activate(state: &GameState, hex: HexId) -> bool {
    state.object_at(hex).is_some_and(|(color, object)| {
        color == state.current_turn
            && !object.activated_abilities.is_empty()
            && !object.cant_activate
            && !object.has_effect(EffectKind::CannotActivate)
    })
}

/// Activate ability `index` of the object at `hex`.
///
/// Afterwards the object cannot move, attack or activate again this turn.
pub fn activate_ability(
    state: &mut GameState,
    player: PlayerColor,
    hex: HexId,
    index: usize,
) -> ScriptResult<()> {
    if state.current_turn != player || !can_activate(state, hex) {
        return Ok(());
    }
    let Some((_, object)) = state.object_at(hex) else {
        return Ok(());
    };
    let Some(ability) = object.activated_abilities.get(index).cloned() else {
        return Ok(());
    };
    let id = object.id;
    let name = object.name().to_string();

    let frame = owner_frame(state, id, &ability.action.frame).with_source(ability.id);
    log::debug!("{name} activates ability {index}");
    script::invoke(state, &ability.action, Vec::new(), frame)?;

    if let Some(object) = state.object_mut(id) {
        object.cant_move = true;
        object.cant_attack = true;
        object.cant_activate = true;
    }
    let text = if ability.text.is_empty() {
        format!("{name} activated its ability")
    } else {
        format!("{name} activated: {}", ability.text)
    };
    state.log_message(Some(player), text);
    triggers::apply_abilities(state)
}
