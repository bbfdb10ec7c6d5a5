//! Match configuration.
//!
//! `GameConfig` carries every tunable constant of a match: board size,
//! kernel health, deck and hand limits, the energy cap and where the two
//! kernels start. The defaults describe the standard game; formats and
//! tests override individual values with the `with_*` builders.

use serde::{Deserialize, Serialize};

use super::PlayerColor;
use crate::hex::{HexGrid, HexId};

/// Configuration for a single match.
///
/// ## Example
///
/// ```
/// use hexbots::core::GameConfig;
///
/// let config = GameConfig::default().with_deck_size(10).with_max_hand_size(5);
/// assert_eq!(config.deck_size, 10);
/// assert_eq!(config.energy_cap, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board radius; the grid holds every hex within this distance of the origin.
    pub board_radius: u32,

    /// Starting health of each kernel.
    pub kernel_health: i64,

    /// Exact deck size enforced by the normal format.
    pub deck_size: usize,

    /// Cards each player draws when the game begins.
    pub starting_hand_size: usize,

    /// Drawing beyond this hand size discards the drawn card instead.
    pub max_hand_size: usize,

    /// Maximum total energy a player can accumulate.
    pub energy_cap: i64,

    /// Upper clamp for computed attributes; the lower clamp is always 0.
    pub max_stat: i64,

    /// Number of cards offered per draft pack.
    pub draft_pack_size: usize,

    /// Hex of the orange kernel.
    pub orange_kernel_hex: HexId,

    /// Hex of the blue kernel.
    pub blue_kernel_hex: HexId,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_radius: 3,
            kernel_health: 20,
            deck_size: 30,
            starting_hand_size: 2,
            max_hand_size: 7,
            energy_cap: 10,
            max_stat: 99,
            draft_pack_size: 4,
            orange_kernel_hex: HexId::new(-3, 0),
            blue_kernel_hex: HexId::new(3, 0),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn with_board_radius(mut self, radius: u32) -> Self {
        self.board_radius = radius;
        self
    }

    #[must_use]
    pub fn with_kernel_health(mut self, health: i64) -> Self {
        self.kernel_health = health;
        self
    }

    #[must_use]
    pub fn with_deck_size(mut self, size: usize) -> Self {
        self.deck_size = size;
        self
    }

    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_energy_cap(mut self, cap: i64) -> Self {
        self.energy_cap = cap;
        self
    }

    #[must_use]
    pub fn with_draft_pack_size(mut self, size: usize) -> Self {
        self.draft_pack_size = size;
        self
    }

    /// The board described by this configuration.
    #[must_use]
    pub fn grid(&self) -> HexGrid {
        HexGrid::new(self.board_radius)
    }

    /// Starting hex of a player's kernel.
    #[must_use]
    pub fn kernel_hex(&self, player: PlayerColor) -> HexId {
        match player {
            PlayerColor::Orange => self.orange_kernel_hex,
            PlayerColor::Blue => self.blue_kernel_hex,
        }
    }

    /// Clamp a computed attribute into `[0, max_stat]`.
    #[must_use]
    pub fn clamp_stat(&self, value: i64) -> i64 {
        value.clamp(0, self.max_stat)
    }
}
