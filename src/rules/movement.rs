//! Movement legality and execution.
//!
//! Range is a breadth-first search outward from the mover's hex, bounded
//! by its remaining speed (`speed - moves_made`). Occupied hexes block the
//! search unless the mover can move over objects, and are never legal
//! destinations.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::cards::Attribute;
use crate::core::{EffectKind, GameState, TriggerKind};
use crate::error::ScriptResult;
use crate::hex::HexId;
use crate::triggers::{self, GameEvent};

/// Steps remaining for the object at `hex`, or `None` if it cannot move.
fn remaining_steps(state: &GameState, hex: HexId) -> Option<u32> {
    let (_, object) = state.object_at(hex)?;
    if !object.is_robot() || object.cant_move || object.has_effect(EffectKind::CannotMove) {
        return None;
    }
    let speed = state.attribute(object.id, Attribute::Speed)?;
    let left = speed - object.moves_made;
    (left > 0).then(|| u32::try_from(left).unwrap_or(0))
}

/// Every legal destination for the object at `hex` with the number of
/// steps needed to reach it, in hex order.
#[must_use]
pub fn reachable(state: &GameState, hex: HexId) -> Vec<(HexId, u32)> {
    let Some(steps) = remaining_steps(state, hex) else {
        return Vec::new();
    };
    let passes_over = state
        .object_at(hex)
        .is_some_and(|(_, o)| o.has_effect(EffectKind::CanMoveOverObjects));
    let grid = state.config.grid();

    let mut distances: FxHashMap<HexId, u32> = FxHashMap::default();
    distances.insert(hex, 0);
    let mut frontier = VecDeque::from([hex]);
    while let Some(current) = frontier.pop_front() {
        let dist = distances[&current];
        if dist == steps {
            continue;
        }
        for next in grid.adjacent(current) {
            if distances.contains_key(&next) {
                continue;
            }
            if state.is_occupied(next) && !passes_over {
                continue;
            }
            distances.insert(next, dist + 1);
            frontier.push_back(next);
        }
    }

    let mut result: Vec<(HexId, u32)> = distances
        .into_iter()
        .filter(|(h, _)| !state.is_occupied(*h))
        .collect();
    result.sort();
    result
}

/// Legal movement destinations for the object at `hex`.
#[must_use]
pub fn valid_movement_hexes(state: &GameState, hex: HexId) -> Vec<HexId> {
    reachable(state, hex).into_iter().map(|(h, _)| h).collect()
}

/// Move the current player's object from `from` to `to`, if legal.
///
/// Fires `afterMoved` tagged with the object's type.
pub fn move_object(state: &mut GameState, from: HexId, to: HexId) -> ScriptResult<()> {
    let Some((color, _)) = state.object_at(from) else {
        return Ok(());
    };
    if color != state.current_turn {
        return Ok(());
    }
    let Some(steps) = reachable(state, from)
        .into_iter()
        .find_map(|(h, steps)| (h == to).then_some(steps))
    else {
        return Ok(());
    };

    let board = &mut state.player_mut(color).board;
    let Some(mut object) = board.remove(&from) else {
        return Ok(());
    };
    object.moves_made += i64::from(steps);
    object.moved_this_turn = true;
    let id = object.id;
    let name = object.name().to_string();
    let tag = object.card_type().name();
    board.insert(to, object);

    log::debug!("{name} moved {from} -> {to}");
    state.log_message(Some(color), format!("{name} moved"));
    state.play_sound("move");

    let event = GameEvent::new(TriggerKind::AfterMoved)
        .with_object(id)
        .with_player(color)
        .with_tag(tag);
    triggers::trigger_event(state, &event, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRegistry};
    use crate::core::{GameConfig, Object, PlayerColor, PlayerMap};
    use std::sync::Arc;

    fn state() -> GameState {
        GameState::new(
            GameConfig::default(),
            Arc::new(CardRegistry::new()),
            PlayerMap::new(|c| c.name().to_string()),
            5,
        )
    }

    fn put(state: &mut GameState, color: PlayerColor, hex: HexId, speed: i64) {
        let card = state.new_card(Arc::new(CardDefinition::robot("Bot", 1, 1, 3, speed)));
        let id = state.alloc_id();
        state.player_mut(color).board.insert(hex, Object::new(id, card));
    }

    #[test]
    fn test_range_is_bounded_by_speed() {
        let mut state = state();
        put(&mut state, PlayerColor::Orange, HexId::origin(), 1);

        let hexes = valid_movement_hexes(&state, HexId::origin());
        assert_eq!(hexes.len(), 6);
        assert!(hexes.iter().all(|h| h.distance(HexId::origin()) == 1));
    }

    #[test]
    fn test_occupied_hexes_block() {
        let mut state = state();
        put(&mut state, PlayerColor::Orange, HexId::new(-3, 0), 2);
        put(&mut state, PlayerColor::Blue, HexId::new(-2, 0), 1);
        put(&mut state, PlayerColor::Blue, HexId::new(-3, 1), 1);

        // The straight path east is blocked; the detour is too long.
        let hexes = valid_movement_hexes(&state, HexId::new(-3, 0));
        assert!(!hexes.contains(&HexId::new(-2, 0)));
        assert!(!hexes.contains(&HexId::new(-1, 0)));
    }

    #[test]
    fn test_cant_move_has_empty_range() {
        let mut state = state();
        put(&mut state, PlayerColor::Orange, HexId::origin(), 2);
        let id = state.object_at(HexId::origin()).unwrap().1.id;
        state.object_mut(id).unwrap().cant_move = true;

        assert!(valid_movement_hexes(&state, HexId::origin()).is_empty());
    }

    #[test]
    fn test_move_spends_steps() {
        let mut state = state();
        put(&mut state, PlayerColor::Orange, HexId::origin(), 2);

        move_object(&mut state, HexId::origin(), HexId::new(1, 0)).unwrap();

        let (_, object) = state.object_at(HexId::new(1, 0)).unwrap();
        assert_eq!(object.moves_made, 1);
        assert!(object.moved_this_turn);
        assert_eq!(valid_movement_hexes(&state, HexId::new(1, 0)).len(), 6);
    }
}
