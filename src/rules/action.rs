//! Inbound action dispatch.

use crate::core::{Continuation, EntityId, GameAction, GameState, PlayerColor};
use crate::error::{Result, ScriptResult};
use crate::formats;

use super::choice::{
    abandon_prompt, deselect, run_interactive, select_card, select_tile, supply_target,
};
use super::combat::{declare_attack, resolve_attack};
use super::movement::move_object;
use super::turn::pass_turn;

/// Apply one inbound action.
///
/// The action runs on a copy of the state and is committed only if it
/// finishes without error, so a malformed card program never leaves a
/// half-applied state behind. Illegal actions return `Ok` and change
/// nothing. Once the game is over every action is ignored; during a
/// draft only draft picks are accepted.
pub fn apply_action(state: &mut GameState, action: &GameAction) -> Result<()> {
    if state.is_over() {
        return Ok(());
    }
    if state.draft.is_some() != matches!(action, GameAction::DraftPick { .. }) {
        return Ok(());
    }

    let mut next = state.clone();
    if let Err(err) = dispatch(&mut next, action) {
        log::debug!("{action:?} failed: {err}");
        return Err(err);
    }
    *state = next;
    Ok(())
}

/// Apply actions in order, stopping at the first error.
pub fn replay<'a>(
    state: &mut GameState,
    actions: impl IntoIterator<Item = &'a GameAction>,
) -> Result<()> {
    for action in actions {
        apply_action(state, action)?;
    }
    Ok(())
}

fn hand_card(state: &GameState, player: PlayerColor, index: usize) -> Option<EntityId> {
    state.player(player).hand.get(index).map(|c| c.id)
}

fn dispatch(state: &mut GameState, action: &GameAction) -> Result<()> {
    let current = state.current_turn;
    match *action {
        GameAction::PassTurn { player } => pass_turn(state, player)?,
        GameAction::SelectCard { player, index } => select_card(state, player, index)?,
        GameAction::SelectTile { player, hex } => select_tile(state, player, hex)?,
        GameAction::Deselect { player } => deselect(state, player),
        GameAction::ChooseTarget { player, target } => supply_target(state, player, target)?,
        GameAction::PlaceCard { card_index, hex } => {
            if let Some(card) = hand_card(state, current, card_index) {
                interactive(state, Continuation::PlaceCard { card, hex })?;
            }
        }
        GameAction::PlayEvent { card_index } => {
            if let Some(card) = hand_card(state, current, card_index) {
                interactive(state, Continuation::PlayEvent { card })?;
            }
        }
        GameAction::ActivateAbility { hex, index } => {
            interactive(state, Continuation::ActivateAbility { hex, index })?;
        }
        GameAction::Move { from, to } => {
            abandon_prompt(state);
            move_object(state, from, to)?;
        }
        GameAction::Attack { from, to } => {
            abandon_prompt(state);
            declare_attack(state, from, to)?;
        }
        GameAction::ResolveAttack => resolve_attack(state)?,
        GameAction::DraftPick { player, index } => formats::draft_pick(state, player, index)?,
    }
    Ok(())
}

fn interactive(state: &mut GameState, continuation: Continuation) -> ScriptResult<()> {
    abandon_prompt(state);
    let player = state.current_turn;
    run_interactive(state, player, continuation)
}
