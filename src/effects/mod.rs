//! Vocabulary verbs and the object lifecycle.
//!
//! - `actions`: what `actions.*` does to the state
//! - `abilities`: installing abilities and applying passive abilities
//! - `lifecycle`: placing, destroying and removing board objects
//!
//! Programs reach these through the interpreter; the rules module calls
//! the lifecycle directly for placement and combat.

pub mod abilities;
pub mod actions;
pub mod lifecycle;

pub use actions::{
    become_card, deal_damage, destroy, discard, draw, give_ability, move_objects, pay_energy,
    refresh, remove_all_abilities, restore_health, return_to_hand, set_attribute, set_card_cost,
    set_energy, shuffle_into_deck, spawn_object, swap_attributes, swap_positions, take_control,
};
pub use lifecycle::{
    damage_objects, destroy_object, kill_dead_objects, place_object, remove_object, Destination,
    CAUSE_COMBAT, CAUSE_EFFECT,
};
