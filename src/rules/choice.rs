//! Selection and the interactive targeting protocol.
//!
//! An action that may ask its player to choose targets runs on a clone
//! of the state. If the clone stops to prompt, the clone is thrown away:
//! the original keeps the prompt and a [`Continuation`] that re-runs the
//! same action. Each answer is appended to the player's chosen list and
//! the continuation runs again from scratch on a fresh clone, consuming
//! the answers in order. Once a run completes without prompting, that
//! clone becomes the state.

use crate::core::{
    ChosenTarget, Continuation, GameState, PlayerColor, StatusKind, TargetSelection,
};
use crate::error::ScriptResult;
use crate::hex::HexId;

use super::combat::{declare_attack, valid_attack_hexes};
use super::movement::{move_object, valid_movement_hexes};
use super::play::{activate_ability, place_card, play_event};

fn run_continuation(
    state: &mut GameState,
    player: PlayerColor,
    continuation: Continuation,
) -> ScriptResult<()> {
    match continuation {
        Continuation::PlayEvent { card } => play_event(state, player, card),
        Continuation::PlaceCard { card, hex } => place_card(state, player, card, hex),
        Continuation::ActivateAbility { hex, index } => activate_ability(state, player, hex, index),
    }
}

/// Run `continuation` speculatively for `player`.
///
/// Interpreter errors propagate and leave `state` untouched. A run that
/// cannot complete is a no-op apart from closing the prompt it was
/// answering, if any.
pub fn run_interactive(
    state: &mut GameState,
    player: PlayerColor,
    continuation: Continuation,
) -> ScriptResult<()> {
    let mut trial = state.clone();
    trial.interactive = Some(player);
    trial.choice_cursor = 0;
    trial.invalid = false;
    let target = &mut trial.player_mut(player).target;
    target.choosing = false;
    target.candidates = None;

    run_continuation(&mut trial, player, continuation)?;

    let selection = trial.player(player).target.clone();
    if selection.choosing {
        log::debug!("{continuation:?} for {player} waits on a target choice");
        state.player_mut(player).target = selection;
        state.continuation = Some(continuation);
        state.set_status(player, StatusKind::Info, "Choose a target");
    } else if trial.invalid {
        log::debug!("{continuation:?} for {player} cannot complete; rolled back");
        // Only an answered prompt leaves anything behind to clear.
        if state.continuation.take().is_some() {
            state.player_mut(player).target = TargetSelection::default();
        }
    } else {
        log::debug!("{continuation:?} for {player} committed");
        trial.interactive = None;
        trial.choice_cursor = 0;
        trial.continuation = None;
        let acting = trial.player_mut(player);
        acting.clear_selection();
        acting.status = None;
        *state = trial;
    }
    Ok(())
}

/// Answer the open target prompt and re-run the pending action.
///
/// Answers outside the offered candidates are ignored.
pub fn supply_target(
    state: &mut GameState,
    player: PlayerColor,
    chosen: ChosenTarget,
) -> ScriptResult<()> {
    let Some(continuation) = state.continuation else {
        return Ok(());
    };
    let target = &state.player(player).target;
    let offered = target.candidates.as_ref().is_some_and(|c| c.contains(chosen));
    if player != state.current_turn || !target.choosing || !offered {
        return Ok(());
    }
    state.player_mut(player).target.chosen.push(chosen);
    run_interactive(state, player, continuation)
}

/// Click a card in hand: answers a card prompt, otherwise toggles the selection.
pub fn select_card(state: &mut GameState, player: PlayerColor, index: usize) -> ScriptResult<()> {
    if state.player(player).target.choosing {
        let Some(card) = state.player(player).hand.get(index).map(|c| c.id) else {
            return Ok(());
        };
        return supply_target(state, player, ChosenTarget::Card(card));
    }
    if player != state.current_turn || index >= state.player(player).hand.len() {
        return Ok(());
    }
    let selection = state.player_mut(player);
    selection.selected_tile = None;
    selection.selected_card = if selection.selected_card == Some(index) {
        None
    } else {
        Some(index)
    };
    Ok(())
}

/// Click a hex.
///
/// Answers a hex prompt if one is open. Otherwise, with a card selected
/// the card is played there; with one of the player's objects selected
/// the object moves to or attacks the hex; anything else selects the
/// player's object on the hex.
pub fn select_tile(state: &mut GameState, player: PlayerColor, hex: HexId) -> ScriptResult<()> {
    if state.player(player).target.choosing {
        return supply_target(state, player, ChosenTarget::Hex(hex));
    }
    if player != state.current_turn {
        return Ok(());
    }

    if let Some(index) = state.player(player).selected_card {
        let card = state.player(player).hand.get(index).map(|c| (c.id, c.card_type()));
        let Some((card, card_type)) = card else {
            state.player_mut(player).selected_card = None;
            return Ok(());
        };
        let continuation = if card_type.is_object() {
            Continuation::PlaceCard { card, hex }
        } else {
            Continuation::PlayEvent { card }
        };
        return run_interactive(state, player, continuation);
    }

    if let Some(from) = state.player(player).selected_tile {
        state.player_mut(player).selected_tile = None;
        if from == hex {
            return Ok(());
        }
        if valid_movement_hexes(state, from).contains(&hex) {
            return move_object(state, from, hex);
        }
        if valid_attack_hexes(state, from).contains(&hex) {
            return declare_attack(state, from, hex);
        }
    }

    if state.object_at(hex).is_some_and(|(color, _)| color == player) {
        state.player_mut(player).selected_tile = Some(hex);
    }
    Ok(())
}

/// Drop the player's selection, cancelling any open prompt.
pub fn deselect(state: &mut GameState, player: PlayerColor) {
    let acting = state.player_mut(player);
    acting.clear_selection();
    acting.status = None;
    if player == state.current_turn {
        state.continuation = None;
    }
}

/// Drop an unanswered prompt before a different action runs.
pub(super) fn abandon_prompt(state: &mut GameState) {
    let player = state.current_turn;
    if state.continuation.take().is_some() {
        state.player_mut(player).target = TargetSelection::default();
    }
}
