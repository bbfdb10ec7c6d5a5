use std::sync::Arc;

use super::{
    begin_match, check_decks, is_constructed_deck_valid, new_state, shuffled_cards, Format,
    GameSetup,
};
use crate::cards::CardDefinition;
use crate::core::{GameConfig, GameState, PlayerColor};
use crate::error::Result;

/// Both decks are merged and shuffled into one pool. Each player is dealt
/// a starting hand from the pool and the rest is a single deck both
/// players draw from.
#[derive(Clone, Copy, Debug, Default)]
pub struct SharedDeckFormat;

impl Format for SharedDeckFormat {
    fn name(&self) -> &'static str {
        "sharedDeck"
    }

    fn is_deck_valid(&self, deck: &[Arc<CardDefinition>], config: &GameConfig) -> bool {
        is_constructed_deck_valid(deck, config)
    }

    fn start_game(&self, setup: GameSetup) -> Result<GameState> {
        check_decks(self, &setup)?;
        let mut state = new_state(&setup);

        let merged: Vec<Arc<CardDefinition>> = PlayerColor::ALL
            .iter()
            .flat_map(|color| setup.decks[*color].iter().cloned())
            .collect();
        let mut pool = shuffled_cards(&mut state, &merged);

        let hand_size = state.config.starting_hand_size.min(pool.len() / 2);
        for color in PlayerColor::ALL {
            let rest = pool.split_off(hand_size);
            state.player_mut(color).hand = pool;
            pool = rest;
        }
        for color in PlayerColor::ALL {
            state.player_mut(color).deck = pool.clone();
        }
        state.shared_deck = true;

        begin_match(&mut state, false)?;
        Ok(state)
    }
}
