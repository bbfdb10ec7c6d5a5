//! Inbound player actions.
//!
//! Every way a client can change a match is one `GameAction`. Actions
//! are plain data so a match can be replayed from its seed plus the
//! ordered list of actions applied to it.

use serde::{Deserialize, Serialize};

use super::player::PlayerColor;
use super::state::ChosenTarget;
use crate::hex::HexId;

/// A complete inbound action.
///
/// Actions that carry no `player` act for the player whose turn it is.
///
/// ## Example
///
/// ```
/// use hexbots::core::{GameAction, PlayerColor};
/// use hexbots::hex::HexId;
///
/// let pass = GameAction::PassTurn { player: PlayerColor::Orange };
/// assert_eq!(pass.player(), Some(PlayerColor::Orange));
///
/// let attack = GameAction::Attack { from: HexId::new(0, 0), to: HexId::new(1, 0) };
/// assert_eq!(attack.player(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameAction {
    PassTurn { player: PlayerColor },
    SelectCard { player: PlayerColor, index: usize },
    SelectTile { player: PlayerColor, hex: HexId },
    Deselect { player: PlayerColor },
    /// Answer an open target prompt directly, e.g. with a discard pile card.
    ChooseTarget { player: PlayerColor, target: ChosenTarget },
    PlaceCard { card_index: usize, hex: HexId },
    PlayEvent { card_index: usize },
    Move { from: HexId, to: HexId },
    Attack { from: HexId, to: HexId },
    ResolveAttack,
    ActivateAbility { hex: HexId, index: usize },
    DraftPick { player: PlayerColor, index: usize },
}

impl GameAction {
    /// The player named by the action, if it names one.
    #[must_use]
    pub fn player(&self) -> Option<PlayerColor> {
        match self {
            GameAction::PassTurn { player }
            | GameAction::SelectCard { player, .. }
            | GameAction::SelectTile { player, .. }
            | GameAction::Deselect { player }
            | GameAction::ChooseTarget { player, .. }
            | GameAction::DraftPick { player, .. } => Some(*player),
            GameAction::PlaceCard { .. }
            | GameAction::PlayEvent { .. }
            | GameAction::Move { .. }
            | GameAction::Attack { .. }
            | GameAction::ResolveAttack
            | GameAction::ActivateAbility { .. } => None,
        }
    }
}
