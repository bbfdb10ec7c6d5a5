//! Entity identification.
//!
//! Every card instance, board object and ability gets a unique `EntityId`
//! from the game state's allocator. IDs are never reused within a match,
//! so a stale ID held by a collection simply fails to resolve once its
//! object leaves the board.
//!
//! ```
//! use hexbots::core::EntityId;
//!
//! let id = EntityId::new(7);
//! assert_eq!(id.raw(), 7);
//! assert_eq!(id.to_string(), "#7");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance, board object or ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_sort_by_allocation_order() {
        let mut ids = vec![EntityId(9), EntityId::from(3), EntityId::new(5)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(3), EntityId(5), EntityId(9)]);
    }

    #[test]
    fn test_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&EntityId(123)).unwrap(), "123");
        let back: EntityId = serde_json::from_str("123").unwrap();
        assert_eq!(back, EntityId(123));
    }
}
