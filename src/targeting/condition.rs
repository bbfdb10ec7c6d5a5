//! Composable target conditions.
//!
//! Conditions are built by `conditions.*` and filter candidates for the
//! collection helpers. A list of conditions matches when every condition
//! matches.

use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::resolver::positions;
use crate::cards::{Attribute, CardInstance};
use crate::core::{EffectKind, GameState, PlayerColor, Property};
use crate::error::ScriptResult;
use crate::hex::HexId;
use crate::script::{self, Closure};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Condition {
    /// Exactly one step from any position in the collection.
    AdjacentTo(Collection),
    /// The closure receives the attribute value and returns a boolean.
    AttributeComparison {
        attribute: Attribute,
        comparator: Closure,
    },
    ControlledBy(Vec<PlayerColor>),
    HasEffect(EffectKind),
    HasProperty(Property),
    /// Between 1 and `distance` steps from any position in `of`.
    WithinDistanceOf { distance: u32, of: Collection },
    ExactDistanceFrom { distance: u32, of: Collection },
    /// One of the positions in the collection.
    Within(Collection),
    Unoccupied,
}

impl Condition {
    /// Test the hex, or the object standing on it.
    pub fn matches_hex(&self, state: &GameState, hex: HexId) -> ScriptResult<bool> {
        let occupant = state.object_at(hex);
        Ok(match self {
            Condition::AdjacentTo(of) => positions(state, of).iter().any(|p| p.distance(hex) == 1),
            Condition::WithinDistanceOf { distance, of } => positions(state, of)
                .iter()
                .any(|p| (1..=*distance).contains(&p.distance(hex))),
            Condition::ExactDistanceFrom { distance, of } => {
                positions(state, of).iter().any(|p| p.distance(hex) == *distance)
            }
            Condition::Within(of) => positions(state, of).contains(&hex),
            Condition::Unoccupied => occupant.is_none(),
            Condition::ControlledBy(players) => {
                occupant.is_some_and(|(color, _)| players.contains(&color))
            }
            Condition::HasEffect(kind) => occupant.is_some_and(|(_, obj)| obj.has_effect(*kind)),
            Condition::HasProperty(property) => {
                occupant.is_some_and(|(_, obj)| obj.has_property(*property))
            }
            Condition::AttributeComparison {
                attribute,
                comparator,
            } => match occupant.and_then(|(_, obj)| state.attribute(obj.id, *attribute)) {
                Some(value) => script::eval_predicate(state, comparator, value)?,
                None => false,
            },
        })
    }

    /// Test a card held by `owner`.
    ///
    /// Only ownership and attribute comparisons apply to cards; positional
    /// and object-state conditions never match.
    pub fn matches_card(
        &self,
        state: &GameState,
        owner: PlayerColor,
        card: &CardInstance,
    ) -> ScriptResult<bool> {
        Ok(match self {
            Condition::ControlledBy(players) => players.contains(&owner),
            Condition::AttributeComparison {
                attribute,
                comparator,
            } => {
                let value = match attribute {
                    Attribute::Cost => Some(state.card_cost(card)),
                    stat => card.definition.stats.get(*stat),
                };
                match value {
                    Some(value) => script::eval_predicate(state, comparator, value)?,
                    None => false,
                }
            }
            _ => false,
        })
    }
}

/// Whether every condition matches at `hex`.
pub fn all_match_hex(
    conditions: &[Condition],
    state: &GameState,
    hex: HexId,
) -> ScriptResult<bool> {
    for condition in conditions {
        if !condition.matches_hex(state, hex)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether every condition matches a card.
pub fn all_match_card(
    conditions: &[Condition],
    state: &GameState,
    owner: PlayerColor,
    card: &CardInstance,
) -> ScriptResult<bool> {
    for condition in conditions {
        if !condition.matches_card(state, owner, card)? {
            return Ok(false);
        }
    }
    Ok(true)
}
