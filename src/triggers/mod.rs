//! Ability reconciliation and event dispatch.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: an event that occurred, with its agent, player and tag
//! - [`trigger_event`]: match triggered abilities and run them
//! - [`apply_abilities`]: the passive-ability reconciliation loop
//! - [`sweep_durations`]: end-of-turn expiry of temporary abilities

mod dispatch;
mod event;
mod reconcile;

pub use dispatch::{trigger_event, DefaultBehavior};
pub use event::GameEvent;
pub use reconcile::{apply_abilities, sweep_durations};
