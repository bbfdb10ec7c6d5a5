//! Match formats: deck legality and match setup.
//!
//! A [`Format`] decides which decks are legal and builds the opening
//! state. Every format ends setup the same way: kernels on their home
//! hexes, starting hands, and orange's first turn (which does not draw).
//!
//! - [`NormalFormat`]: each player brings an independent deck
//! - [`SharedDeckFormat`]: both decks are merged into one shared deck
//! - [`DraftFormat`]: decks are drafted from the registry before play

mod draft;
mod normal;
mod shared;

use std::sync::Arc;

use im::Vector;

use crate::cards::{CardDefinition, CardInstance, CardRegistry, CardType};
use crate::core::{GameConfig, GameState, PlayerColor, PlayerMap};
use crate::effects::place_object;
use crate::error::{GameError, Result};
use crate::rules;

pub use draft::{draft_pick, DraftFormat, DraftState};
pub use normal::NormalFormat;
pub use shared::SharedDeckFormat;

/// Everything a format needs to start a match.
#[derive(Clone, Debug)]
pub struct GameSetup {
    pub config: GameConfig,
    pub registry: Arc<CardRegistry>,
    pub usernames: PlayerMap<String>,
    pub decks: PlayerMap<Vec<Arc<CardDefinition>>>,
    pub seed: u64,
}

impl GameSetup {
    /// Setup with the default configuration.
    #[must_use]
    pub fn new(
        registry: Arc<CardRegistry>,
        usernames: PlayerMap<String>,
        decks: PlayerMap<Vec<Arc<CardDefinition>>>,
        seed: u64,
    ) -> Self {
        Self {
            config: GameConfig::default(),
            registry,
            usernames,
            decks,
            seed,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }
}

/// A pluggable match format.
pub trait Format {
    fn name(&self) -> &'static str;

    /// Whether `deck` may be brought to a match of this format.
    fn is_deck_valid(&self, deck: &[Arc<CardDefinition>], config: &GameConfig) -> bool;

    /// Build the opening state.
    ///
    /// Fails with [`GameError::InvalidDeck`] if either deck is illegal.
    fn start_game(&self, setup: GameSetup) -> Result<GameState>;
}

/// Look up a built-in format by its name.
#[must_use]
pub fn format_by_name(name: &str) -> Option<Box<dyn Format>> {
    match name {
        "normal" => Some(Box::new(NormalFormat)),
        "sharedDeck" => Some(Box::new(SharedDeckFormat)),
        "draft" => Some(Box::new(DraftFormat)),
        _ => None,
    }
}

/// Exactly `deck_size` cards, none of them kernels.
fn is_constructed_deck_valid(deck: &[Arc<CardDefinition>], config: &GameConfig) -> bool {
    deck.len() == config.deck_size && deck.iter().all(|card| card.card_type != CardType::Kernel)
}

fn check_decks(format: &dyn Format, setup: &GameSetup) -> Result<()> {
    for (color, deck) in setup.decks.iter() {
        if !format.is_deck_valid(deck, &setup.config) {
            return Err(GameError::InvalidDeck(format!(
                "{} ({color}) has a deck that is not legal in the {} format",
                setup.usernames[color],
                format.name()
            )));
        }
    }
    Ok(())
}

fn new_state(setup: &GameSetup) -> GameState {
    GameState::new(
        setup.config.clone(),
        setup.registry.clone(),
        setup.usernames.clone(),
        setup.seed,
    )
}

/// Instantiate `cards` and shuffle them with the match RNG.
fn shuffled_cards(state: &mut GameState, cards: &[Arc<CardDefinition>]) -> Vector<CardInstance> {
    let mut instances: Vec<CardInstance> =
        cards.iter().map(|def| state.new_card(def.clone())).collect();
    state.rng.shuffle(&mut instances);
    instances.into_iter().collect()
}

/// Place kernels, optionally deal starting hands, and start orange's first turn.
fn begin_match(state: &mut GameState, deal_hands: bool) -> Result<()> {
    let kernel = state
        .registry
        .find_by_type(CardType::Kernel)
        .next()
        .cloned()
        .unwrap_or_else(|| Arc::new(CardDefinition::kernel("Kernel", state.config.kernel_health)));
    for color in PlayerColor::ALL {
        let hex = state.config.kernel_hex(color);
        let card = state.new_card(kernel.clone());
        place_object(state, color, card, hex)?;
    }
    if deal_hands {
        let count = state.config.starting_hand_size;
        for color in PlayerColor::ALL {
            state.draw_cards(color, count);
        }
    }

    state.started = true;
    log::debug!("match started with seed {}", state.rng.seed());
    state.log_message(None, "The game has started");
    rules::start_turn(state, PlayerColor::Orange, false)?;
    Ok(())
}
