//! Kind-tagged, ordered target collections.
//!
//! Every target expression evaluates to a `Collection`. The kind decides
//! which actions accept it; actions that expect objects transparently
//! redirect a `Players` collection to those players' kernels.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerColor};
use crate::hex::HexId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Objects,
    CardsInHand,
    CardsInDiscardPile,
    Hexes,
    Players,
}

impl CollectionKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CollectionKind::Objects => "objects",
            CollectionKind::CardsInHand => "cards in hand",
            CollectionKind::CardsInDiscardPile => "cards in discard pile",
            CollectionKind::Hexes => "hexes",
            CollectionKind::Players => "players",
        }
    }
}

/// An ordered result of resolving a target expression.
///
/// ```
/// use hexbots::core::PlayerColor;
/// use hexbots::targeting::{Collection, CollectionKind};
///
/// let players = Collection::Players(vec![PlayerColor::Orange, PlayerColor::Blue]);
/// assert_eq!(players.kind(), CollectionKind::Players);
/// assert_eq!(players.len(), 2);
/// assert_eq!(players.split().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collection {
    Objects(Vec<EntityId>),
    CardsInHand(Vec<EntityId>),
    CardsInDiscardPile(Vec<EntityId>),
    Hexes(Vec<HexId>),
    Players(Vec<PlayerColor>),
}

impl Collection {
    #[must_use]
    pub fn empty(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Objects => Collection::Objects(Vec::new()),
            CollectionKind::CardsInHand => Collection::CardsInHand(Vec::new()),
            CollectionKind::CardsInDiscardPile => Collection::CardsInDiscardPile(Vec::new()),
            CollectionKind::Hexes => Collection::Hexes(Vec::new()),
            CollectionKind::Players => Collection::Players(Vec::new()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        match self {
            Collection::Objects(_) => CollectionKind::Objects,
            Collection::CardsInHand(_) => CollectionKind::CardsInHand,
            Collection::CardsInDiscardPile(_) => CollectionKind::CardsInDiscardPile,
            Collection::Hexes(_) => CollectionKind::Hexes,
            Collection::Players(_) => CollectionKind::Players,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Collection::Objects(v)
            | Collection::CardsInHand(v)
            | Collection::CardsInDiscardPile(v) => v.len(),
            Collection::Hexes(v) => v.len(),
            Collection::Players(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the entries at `indices`, in the given order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        fn pick<T: Copy>(items: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().filter_map(|&i| items.get(i).copied()).collect()
        }
        match self {
            Collection::Objects(v) => Collection::Objects(pick(v, indices)),
            Collection::CardsInHand(v) => Collection::CardsInHand(pick(v, indices)),
            Collection::CardsInDiscardPile(v) => Collection::CardsInDiscardPile(pick(v, indices)),
            Collection::Hexes(v) => Collection::Hexes(pick(v, indices)),
            Collection::Players(v) => Collection::Players(pick(v, indices)),
        }
    }

    /// One single-entry collection per entry, in order.
    #[must_use]
    pub fn split(&self) -> Vec<Collection> {
        (0..self.len()).map(|i| self.select(&[i])).collect()
    }

    /// Entity IDs for object and card collections; empty otherwise.
    #[must_use]
    pub fn entity_ids(&self) -> &[EntityId] {
        match self {
            Collection::Objects(v)
            | Collection::CardsInHand(v)
            | Collection::CardsInDiscardPile(v) => v,
            Collection::Hexes(_) | Collection::Players(_) => &[],
        }
    }

    #[must_use]
    pub fn contains_object(&self, id: EntityId) -> bool {
        matches!(self, Collection::Objects(ids) if ids.contains(&id))
    }

    #[must_use]
    pub fn contains_player(&self, player: PlayerColor) -> bool {
        matches!(self, Collection::Players(ps) if ps.contains(&player))
    }
}
