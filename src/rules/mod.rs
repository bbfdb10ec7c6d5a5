//! Turn and combat state machine, legality queries, and inbound actions.
//!
//! - `movement`: BFS movement range and moves
//! - `combat`: attack range, declaration and simultaneous resolution
//! - `play`: placing cards, playing events, activated abilities
//! - `choice`: selection and the interactive targeting protocol
//! - `turn`: passing the turn, energy and draws
//! - `action`: [`apply_action`], the single entry point for clients
//!
//! Every function here treats an illegal request as a no-op: it returns
//! `Ok` without touching the state.

mod action;
mod choice;
mod combat;
mod movement;
mod play;
mod turn;

pub use action::{apply_action, replay};
pub use choice::{deselect, run_interactive, select_card, select_tile, supply_target};
pub use combat::{declare_attack, resolve_attack, valid_attack_hexes};
pub use movement::{move_object, reachable, valid_movement_hexes};
pub use play::{activate_ability, can_activate, place_card, play_event, valid_placement_hexes};
pub use turn::{pass_turn, start_turn};
