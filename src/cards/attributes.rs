//! Card and object attributes.
//!
//! Cards carry up to three printed stats (attack, health, speed) plus a
//! cost. Events have no stats at all, structures have health only, and
//! kernels have health only. A missing stat is `None`, which is distinct
//! from a stat of zero.
//!
//! ## Attribute names
//!
//! Programs refer to attributes by lowercase name: `"attack"`, `"health"`,
//! `"speed"`, `"cost"`. The pseudo-attribute `"allattributes"` selects
//! attack, health and speed at once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// A numeric attribute of a card or object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Attack,
    Health,
    Speed,
    Cost,
}

impl Attribute {
    /// The stats selected by `"allattributes"`.
    pub const STATS: [Attribute; 3] = [Attribute::Attack, Attribute::Health, Attribute::Speed];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Attack => "attack",
            Attribute::Health => "health",
            Attribute::Speed => "speed",
            Attribute::Cost => "cost",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attack" => Ok(Attribute::Attack),
            "health" => Ok(Attribute::Health),
            "speed" => Ok(Attribute::Speed),
            "cost" => Ok(Attribute::Cost),
            other => Err(ScriptError::UnknownAttribute(other.to_string())),
        }
    }
}

/// Attribute argument of an effect: one attribute or every stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeSelector {
    One(Attribute),
    AllStats,
}

impl AttributeSelector {
    /// The concrete attributes this selector covers.
    #[must_use]
    pub fn attributes(self) -> Vec<Attribute> {
        match self {
            AttributeSelector::One(attr) => vec![attr],
            AttributeSelector::AllStats => Attribute::STATS.to_vec(),
        }
    }
}

impl FromStr for AttributeSelector {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "allattributes" {
            Ok(AttributeSelector::AllStats)
        } else {
            s.parse().map(AttributeSelector::One)
        }
    }
}

/// Printed or current stats of a card or object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub attack: Option<i64>,
    pub health: Option<i64>,
    pub speed: Option<i64>,
}

impl Stats {
    /// Stats of a robot.
    #[must_use]
    pub const fn robot(attack: i64, health: i64, speed: i64) -> Self {
        Self {
            attack: Some(attack),
            health: Some(health),
            speed: Some(speed),
        }
    }

    /// Stats of a structure or kernel: health only.
    #[must_use]
    pub const fn health_only(health: i64) -> Self {
        Self {
            attack: None,
            health: Some(health),
            speed: None,
        }
    }

    /// Read a stat. `Cost` is not a stat and always reads `None`.
    #[must_use]
    pub fn get(&self, attr: Attribute) -> Option<i64> {
        match attr {
            Attribute::Attack => self.attack,
            Attribute::Health => self.health,
            Attribute::Speed => self.speed,
            Attribute::Cost => None,
        }
    }

    /// Write a stat. Writing `Cost` is ignored.
    pub fn set(&mut self, attr: Attribute, value: i64) {
        match attr {
            Attribute::Attack => self.attack = Some(value),
            Attribute::Health => self.health = Some(value),
            Attribute::Speed => self.speed = Some(value),
            Attribute::Cost => {}
        }
    }

    /// Add `delta` to a stat if the stat exists.
    pub fn adjust(&mut self, attr: Attribute, delta: i64) {
        if let Some(value) = self.get(attr) {
            self.set(attr, value + delta);
        }
    }
}
