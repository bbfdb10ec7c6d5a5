use std::sync::Arc;

use super::{
    begin_match, check_decks, is_constructed_deck_valid, new_state, shuffled_cards, Format,
    GameSetup,
};
use crate::cards::CardDefinition;
use crate::core::{GameConfig, GameState, PlayerColor};
use crate::error::Result;

/// Each player shuffles and draws from their own deck.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalFormat;

impl Format for NormalFormat {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn is_deck_valid(&self, deck: &[Arc<CardDefinition>], config: &GameConfig) -> bool {
        is_constructed_deck_valid(deck, config)
    }

    fn start_game(&self, setup: GameSetup) -> Result<GameState> {
        check_decks(self, &setup)?;
        let mut state = new_state(&setup);
        for color in PlayerColor::ALL {
            let deck = shuffled_cards(&mut state, &setup.decks[color]);
            state.player_mut(color).deck = deck;
        }
        begin_match(&mut state, true)?;
        Ok(state)
    }
}
