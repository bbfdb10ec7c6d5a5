//! Player identification and per-player data storage.
//!
//! ## PlayerColor
//!
//! The game always has exactly two sides, identified by color.
//! Orange moves first.
//!
//! ## PlayerMap
//!
//! Per-player storage indexed by `PlayerColor`.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two fixed player identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Orange,
    Blue,
}

impl PlayerColor {
    /// Both colors, in turn order.
    pub const ALL: [PlayerColor; 2] = [PlayerColor::Orange, PlayerColor::Blue];

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerColor::Orange => PlayerColor::Blue,
            PlayerColor::Blue => PlayerColor::Orange,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerColor::Orange => 0,
            PlayerColor::Blue => 1,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerColor::Orange => "orange",
            PlayerColor::Blue => "blue",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orange" => Ok(PlayerColor::Orange),
            "blue" => Ok(PlayerColor::Blue),
            other => Err(format!("unknown player color: {other}")),
        }
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use hexbots::core::{PlayerColor, PlayerMap};
///
/// let mut energy: PlayerMap<i64> = PlayerMap::new(|_| 0);
/// energy[PlayerColor::Blue] = 3;
///
/// assert_eq!(energy[PlayerColor::Orange], 0);
/// assert_eq!(energy[PlayerColor::Blue], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerColor) -> T) -> Self {
        Self {
            data: [factory(PlayerColor::Orange), factory(PlayerColor::Blue)],
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    #[must_use]
    pub fn get(&self, player: PlayerColor) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerColor) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerColor, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerColor, &T)> {
        PlayerColor::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (PlayerColor, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerColor, &mut T)> {
        PlayerColor::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Transform every entry, keeping the color association.
    pub fn map<U>(self, f: impl Fn(PlayerColor, T) -> U) -> PlayerMap<U> {
        let [orange, blue] = self.data;
        PlayerMap {
            data: [f(PlayerColor::Orange, orange), f(PlayerColor::Blue, blue)],
        }
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerColor> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerColor) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerColor> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerColor) -> &mut Self::Output {
        self.get_mut(player)
    }
}
