use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{begin_match, new_state, shuffled_cards, Format, GameSetup};
use crate::cards::{CardDefinition, CardType};
use crate::core::{GameConfig, GameState, PlayerColor, PlayerMap};
use crate::error::{GameError, Result};

/// Players build their decks during the match: each turn of the draft
/// the picker is offered a pack of random cards from the registry and
/// keeps one. Once both decks are full, play starts as in the normal
/// format.
#[derive(Clone, Copy, Debug, Default)]
pub struct DraftFormat;

/// Progress of a draft.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DraftState {
    pub pool: Vec<Arc<CardDefinition>>,
    /// The pack currently offered to each player; empty when not picking.
    pub packs: PlayerMap<Vec<Arc<CardDefinition>>>,
    pub picked: PlayerMap<Vec<Arc<CardDefinition>>>,
    pub picker: PlayerColor,
}

impl Format for DraftFormat {
    fn name(&self) -> &'static str {
        "draft"
    }

    /// Decks are built by drafting, so any brought deck is ignored.
    fn is_deck_valid(&self, _deck: &[Arc<CardDefinition>], _config: &GameConfig) -> bool {
        true
    }

    fn start_game(&self, setup: GameSetup) -> Result<GameState> {
        let pool: Vec<Arc<CardDefinition>> = setup
            .registry
            .iter()
            .filter(|card| card.card_type != CardType::Kernel)
            .cloned()
            .collect();
        if pool.is_empty() {
            return Err(GameError::Format("draft pool is empty".to_string()));
        }

        let mut state = new_state(&setup);
        let mut draft = DraftState {
            pool,
            packs: PlayerMap::default(),
            picked: PlayerMap::default(),
            picker: PlayerColor::Orange,
        };
        deal_pack(&mut state, &mut draft);
        state.draft = Some(draft);
        Ok(state)
    }
}

fn deal_pack(state: &mut GameState, draft: &mut DraftState) {
    let size = state.config.draft_pack_size.max(1);
    let pack = (0..size)
        .filter_map(|_| state.rng.choose(&draft.pool).cloned())
        .collect();
    draft.packs[draft.picker] = pack;
}

/// Keep card `index` of `player`'s pack.
///
/// Ignored unless `player` is the current picker. Players alternate;
/// once a player's deck is full the other picks alone. When both decks
/// are full the decks are shuffled and the match begins.
pub fn draft_pick(state: &mut GameState, player: PlayerColor, index: usize) -> Result<()> {
    let Some(mut draft) = state.draft.clone() else {
        return Ok(());
    };
    if draft.picker != player {
        return Ok(());
    }
    let Some(card) = draft.packs[player].get(index).cloned() else {
        return Ok(());
    };

    log::debug!("{player} drafts {}", card.name);
    draft.packs[player].clear();
    draft.picked[player].push(card);

    let deck_size = state.config.deck_size;
    let full = |color: PlayerColor| draft.picked[color].len() >= deck_size;
    if full(PlayerColor::Orange) && full(PlayerColor::Blue) {
        state.draft = None;
        for color in PlayerColor::ALL {
            let deck = shuffled_cards(state, &draft.picked[color]);
            state.player_mut(color).deck = deck;
        }
        return begin_match(state, true);
    }

    if !full(player.opponent()) {
        draft.picker = player.opponent();
    }
    deal_pack(state, &mut draft);
    state.draft = Some(draft);
    Ok(())
}
