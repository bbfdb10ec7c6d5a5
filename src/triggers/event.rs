//! Game events.
//!
//! Events are fired when things happen on the board. Triggered abilities
//! listen for a `TriggerKind` and, optionally, a tag: the damaged object's
//! type for `afterDamageReceived`, the cause for `afterDestroyed`, and so
//! on.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerColor, TriggerKind};

/// A game event with contextual data.
///
/// ## Event Data
///
/// - `kind`: what kind of event this is
/// - `object`: the agent, bound to `targets.it()` in trigger actions
/// - `player`: the player the event concerns, bound to `targets.itP()`
/// - `undergoer`: the other party, bound to `targets.that()`
/// - `tag`: matched against trigger filters
///
/// ## Example
///
/// ```
/// use hexbots::core::{EntityId, PlayerColor, TriggerKind};
/// use hexbots::triggers::GameEvent;
///
/// let event = GameEvent::new(TriggerKind::AfterAttack)
///     .with_object(EntityId(4))
///     .with_undergoer(EntityId(9))
///     .with_tag("robot");
///
/// assert_eq!(event.undergoer, Some(EntityId(9)));
/// assert_eq!(event.tag.as_deref(), Some("robot"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: TriggerKind,
    pub object: Option<EntityId>,
    pub player: Option<PlayerColor>,
    pub undergoer: Option<EntityId>,
    pub tag: Option<String>,
}

impl GameEvent {
    #[must_use]
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            object: None,
            player: None,
            undergoer: None,
            tag: None,
        }
    }

    /// Start or end of `player`'s turn.
    #[must_use]
    pub fn turn(kind: TriggerKind, player: PlayerColor) -> Self {
        Self::new(kind).with_player(player)
    }

    #[must_use]
    pub fn with_object(mut self, object: EntityId) -> Self {
        self.object = Some(object);
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerColor) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with_undergoer(mut self, undergoer: EntityId) -> Self {
        self.undergoer = Some(undergoer);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_event() {
        let event = GameEvent::turn(TriggerKind::BeginningOfTurn, PlayerColor::Blue);
        assert_eq!(event.player, Some(PlayerColor::Blue));
        assert_eq!(event.object, None);
        assert_eq!(event.tag, None);
    }
}
