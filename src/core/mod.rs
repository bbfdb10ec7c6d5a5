//! Core engine types: entities, players, RNG, configuration, state.
//!
//! This module holds the data model every other module reads and mutates:
//! `GameState` with its two `PlayerState`s, board `Object`s, and the
//! ability records attached to them.

pub mod ability;
pub mod action;
pub mod config;
pub mod entity;
pub mod object;
pub mod player;
pub mod rng;
pub mod state;

pub use ability::{
    AbilityTargets, ActivatedAbility, EffectKind, ObjectEffect, PassiveAbility, PassiveKind,
    StatAdjustment, TriggerKind, TriggerSpec, TriggeredAbility,
};
pub use action::GameAction;
pub use config::GameConfig;
pub use entity::EntityId;
pub use object::{Object, Property};
pub use player::{PlayerColor, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{
    CardZone, ChosenTarget, Continuation, Energy, GameState, LogEntry, PendingAttack, PlayerState,
    StatusKind, StatusMessage, TargetCandidates, TargetSelection, Winner,
};
