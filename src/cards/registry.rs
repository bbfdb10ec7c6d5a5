//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition known to a match. It
//! provides lookup by `CardId` and by name; `spawnObject` and `become`
//! resolve card names through it at runtime.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId, CardType};
use crate::error::ScriptResult;

/// Registry of card definitions.
///
/// Serializes as the plain list of definitions; the name index is
/// rebuilt on load.
///
/// ## Example
///
/// ```
/// use hexbots::cards::{CardRegistry, CardDefinition};
///
/// let mut registry = CardRegistry::new();
/// let id = registry
///     .register(CardDefinition::robot("Attack Bot", 1, 1, 1, 2))
///     .unwrap();
///
/// assert_eq!(registry.get(id).unwrap().name, "Attack Bot");
/// assert!(registry.by_name("Attack Bot").is_some());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Arc<CardDefinition>>", into = "Vec<Arc<CardDefinition>>")]
pub struct CardRegistry {
    cards: Vec<Arc<CardDefinition>>,
    by_name: FxHashMap<String, CardId>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a card definition, assigning its ID.
    ///
    /// Registering a name that already exists replaces the lookup by name
    /// but keeps the older definition reachable by ID.
    pub fn register(&mut self, mut card: CardDefinition) -> ScriptResult<CardId> {
        card.validate()?;
        let id = CardId::new(self.cards.len() as u32);
        card.id = id;
        self.by_name.insert(card.name.clone(), id);
        self.cards.push(Arc::new(card));
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(id.raw() as usize)
    }

    /// Look up a definition by exact card name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.iter()
    }

    /// Find cards by type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.cards.iter().filter(move |c| c.card_type == card_type)
    }
}

impl From<Vec<Arc<CardDefinition>>> for CardRegistry {
    fn from(cards: Vec<Arc<CardDefinition>>) -> Self {
        let by_name = cards.iter().map(|c| (c.name.clone(), c.id)).collect();
        Self { cards, by_name }
    }
}

impl From<CardRegistry> for Vec<Arc<CardDefinition>> {
    fn from(registry: CardRegistry) -> Self {
        registry.cards
    }
}
