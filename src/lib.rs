//! # hexbots
//!
//! Rules engine for a two-player card game played on a hex grid. Players
//! place robots and structures next to their kernels, move and fight
//! across the board, and play events. Every card's behavior is a small
//! program in a closed vocabulary that the engine interprets against
//! the live game state.
//!
//! ## Design Principles
//!
//! 1. **Closed vocabulary**: card programs are parsed into an AST and
//!    checked against a fixed table of builtins when a card is registered,
//!    so a malformed card is rejected before it can reach a match.
//!
//! 2. **Illegal is a no-op**: an action a player is not allowed to take
//!    returns `Ok` and leaves the state unchanged. Errors are reserved for
//!    malformed programs, illegal decks and snapshot failures.
//!
//! 3. **Deterministic**: every random decision draws from the seeded RNG
//!    carried in the state, so a seed plus an action list replays a match
//!    exactly.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: hands, decks and boards are `im`
//!   collections, so cloning the state to run an action speculatively is
//!   O(1). Interactive targeting is built on that: an action that needs a
//!   target runs on a clone, and is re-run once the player answers.
//!
//! - **Full reconciliation**: passive abilities are recomputed from
//!   scratch after every board change rather than tracked incrementally.
//!
//! ## Modules
//!
//! - `hex`: cube-coordinate hexes and the board grid
//! - `core`: entity IDs, players, state, actions, RNG, configuration
//! - `cards`: card definitions, instances and the registry
//! - `targeting`: collections, conditions and target resolution
//! - `script`: the card-program parser and interpreter
//! - `effects`: what program actions do, and the object lifecycle
//! - `triggers`: event dispatch and passive-ability reconciliation
//! - `rules`: turns, movement, combat, placement and inbound actions
//! - `formats`: normal, shared-deck and draft match setup
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hexbots::cards::{CardDefinition, CardRegistry};
//! use hexbots::core::{GameAction, PlayerColor, PlayerMap};
//! use hexbots::formats::{Format, GameSetup, NormalFormat};
//! use hexbots::rules;
//!
//! let mut registry = CardRegistry::new();
//! registry.register(CardDefinition::robot("Attack Bot", 1, 1, 1, 2)).unwrap();
//! let registry = Arc::new(registry);
//! let bot = registry.by_name("Attack Bot").unwrap().clone();
//!
//! let decks = PlayerMap::new(|_| vec![bot.clone(); 30]);
//! let usernames = PlayerMap::new(|c| c.name().to_string());
//! let setup = GameSetup::new(registry, usernames, decks, 7);
//! let mut state = NormalFormat.start_game(setup).unwrap();
//!
//! assert_eq!(state.current_turn, PlayerColor::Orange);
//! rules::apply_action(&mut state, &GameAction::PassTurn { player: PlayerColor::Orange }).unwrap();
//! assert_eq!(state.current_turn, PlayerColor::Blue);
//! ```

pub mod cards;
pub mod core;
pub mod effects;
pub mod error;
pub mod formats;
pub mod hex;
pub mod rules;
pub mod script;
pub mod targeting;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    EntityId, GameAction, GameConfig, GameRng, GameRngState, GameState, PlayerColor, PlayerMap,
    Winner,
};

pub use crate::cards::{Attribute, CardDefinition, CardId, CardInstance, CardRegistry, CardType};

pub use crate::error::{GameError, Result, ScriptError, ScriptResult};

pub use crate::formats::{DraftFormat, Format, GameSetup, NormalFormat, SharedDeckFormat};

pub use crate::hex::{HexGrid, HexId};

pub use crate::rules::apply_action;

pub use crate::script::Program;

pub use crate::targeting::Collection;

pub use crate::triggers::GameEvent;
