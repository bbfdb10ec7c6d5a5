//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its name,
//! type, printed cost and stats, and the effect programs it carries.
//! Robots and structures carry `abilities` (run when the object enters
//! the board); events carry `command` (run when the event is played).
//!
//! Runtime data (current cost, cost adjustments) lives on `CardInstance`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::attributes::Stats;
use crate::error::{ScriptError, ScriptResult};
use crate::script::Program;

/// Unique identifier for a card definition within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The four kinds of card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Robot,
    Event,
    Structure,
    Kernel,
}

impl CardType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::Robot => "robot",
            CardType::Event => "event",
            CardType::Structure => "structure",
            CardType::Kernel => "kernel",
        }
    }

    /// Whether cards of this type become objects on the board.
    #[must_use]
    pub const fn is_object(self) -> bool {
        !matches!(self, CardType::Event)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardType {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "robot" => Ok(CardType::Robot),
            "event" => Ok(CardType::Event),
            "structure" => Ok(CardType::Structure),
            "kernel" | "core" => Ok(CardType::Kernel),
            other => Err(ScriptError::UnknownCardType(other.to_string())),
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use hexbots::cards::{CardDefinition, CardType};
///
/// let bot = CardDefinition::robot("Tank Bot", 3, 2, 4, 1)
///     .with_ability("setAbility(abilities.applyEffect(() => targets.thisObject(), 'taunt'))")
///     .with_text("Taunt");
///
/// assert_eq!(bot.card_type, CardType::Robot);
/// assert!(bot.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Assigned by the registry on registration.
    pub id: CardId,

    pub name: String,

    pub card_type: CardType,

    /// Printed energy cost.
    pub cost: i64,

    /// Printed stats.
    pub stats: Stats,

    /// Programs run when the object enters the board.
    pub abilities: Vec<String>,

    /// Programs run when the event is played.
    pub command: Vec<String>,

    /// Rules text shown to players.
    pub text: String,
}

impl CardDefinition {
    /// Create a definition with no stats and no programs.
    #[must_use]
    pub fn new(name: impl Into<String>, card_type: CardType, cost: i64) -> Self {
        Self {
            id: CardId::new(0),
            name: name.into(),
            card_type,
            cost,
            stats: Stats::default(),
            abilities: Vec::new(),
            command: Vec::new(),
            text: String::new(),
        }
    }

    #[must_use]
    pub fn robot(name: impl Into<String>, cost: i64, attack: i64, health: i64, speed: i64) -> Self {
        Self::new(name, CardType::Robot, cost).with_stats(Stats::robot(attack, health, speed))
    }

    #[must_use]
    pub fn structure(name: impl Into<String>, cost: i64, health: i64) -> Self {
        Self::new(name, CardType::Structure, cost).with_stats(Stats::health_only(health))
    }

    #[must_use]
    pub fn event(name: impl Into<String>, cost: i64) -> Self {
        Self::new(name, CardType::Event, cost)
    }

    #[must_use]
    pub fn kernel(name: impl Into<String>, health: i64) -> Self {
        Self::new(name, CardType::Kernel, 0).with_stats(Stats::health_only(health))
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    /// Add an ability program (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, program: impl Into<String>) -> Self {
        self.abilities.push(program.into());
        self
    }

    /// Add a command program (builder pattern).
    #[must_use]
    pub fn with_command(mut self, program: impl Into<String>) -> Self {
        self.command.push(program.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Compile every program this card carries.
    ///
    /// Fails on the first program with a syntax error, an unknown
    /// identifier, a wrong arity or an unbound variable.
    pub fn validate(&self) -> ScriptResult<()> {
        for source in self.abilities.iter().chain(&self.command) {
            Program::compile(source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_builder() {
        let bot = CardDefinition::robot("Attack Bot", 1, 1, 1, 2);
        assert_eq!(bot.card_type, CardType::Robot);
        assert_eq!(bot.stats, Stats::robot(1, 1, 2));
        assert!(bot.abilities.is_empty());
    }

    #[test]
    fn test_event_has_no_stats() {
        let shock = CardDefinition::event("Shock", 1)
            .with_command(
                "actions.dealDamage(targets.choose(objectsMatchingConditions('robot', []), 1), 3)",
            );
        assert_eq!(shock.stats, Stats::default());
        assert!(!shock.card_type.is_object());
        assert!(shock.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_builtin() {
        let bad = CardDefinition::event("Bad", 1).with_command("actions.explode(targets.self())");
        assert!(matches!(bad.validate(), Err(ScriptError::UnknownIdentifier(_))));
    }

    #[test]
    fn test_card_type_parse() {
        assert_eq!("core".parse::<CardType>().unwrap(), CardType::Kernel);
        assert_eq!("structure".parse::<CardType>().unwrap(), CardType::Structure);
        assert!("spell".parse::<CardType>().is_err());
    }
}
