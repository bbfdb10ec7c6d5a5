//! Turn transitions.

use crate::core::{GameState, PlayerColor, TriggerKind};
use crate::error::ScriptResult;
use crate::triggers::{self, GameEvent};

/// End the current turn and start the opponent's.
///
/// Does nothing unless `player` is the player whose turn it is.
pub fn pass_turn(state: &mut GameState, player: PlayerColor) -> ScriptResult<()> {
    if !state.started || player != state.current_turn {
        return Ok(());
    }
    end_turn(state)?;
    if state.is_over() {
        return Ok(());
    }
    start_turn(state, player.opponent(), true)
}

fn end_turn(state: &mut GameState) -> ScriptResult<()> {
    let player = state.current_turn;
    log::debug!("{player} ends turn {}", state.turn_number);
    state.player_mut(player).clear_selection();
    state.continuation = None;
    state.attack = None;

    let ids: Vec<_> = state.player(player).board.values().map(|o| o.id).collect();
    for id in ids {
        if let Some(object) = state.object_mut(id) {
            object.end_turn_flags();
        }
    }

    triggers::sweep_durations(state)?;
    triggers::trigger_event(state, &GameEvent::turn(TriggerKind::EndOfTurn, player), None)?;
    state.check_victory();
    Ok(())
}

/// Begin `player`'s turn: grow and refill energy, reset their objects'
/// per-turn flags, draw a card if `draw` is set, fire `beginningOfTurn`.
pub fn start_turn(state: &mut GameState, player: PlayerColor, draw: bool) -> ScriptResult<()> {
    state.current_turn = player;
    state.turn_number += 1;

    let cap = state.config.energy_cap;
    let energy = &mut state.player_mut(player).energy;
    energy.total = (energy.total + 1).min(cap);
    energy.available = energy.total;

    let ids: Vec<_> = state.player(player).board.values().map(|o| o.id).collect();
    for id in ids {
        if let Some(object) = state.object_mut(id) {
            object.reset_turn_flags();
        }
    }
    if draw {
        state.draw_cards(player, 1);
    }

    log::debug!("{player} starts turn {}", state.turn_number);
    let text = format!("{}'s turn", state.player(player).username);
    state.log_message(Some(player), text);
    state.play_sound("yourmove");
    triggers::trigger_event(state, &GameEvent::turn(TriggerKind::BeginningOfTurn, player), None)
}
