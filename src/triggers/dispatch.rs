//! Event dispatch.
//!
//! `trigger_event` collects every triggered ability on the board whose
//! kind and filter match the event and whose scope contains the event's
//! subject, runs the event's default behavior unless a match overrides it,
//! then runs the matched actions in board order.

use crate::core::{EntityId, GameState, TriggeredAbility};
use crate::effects::abilities::owner_frame;
use crate::error::ScriptResult;
use crate::script::{self, Frame};
use crate::targeting::Collection;

use super::event::GameEvent;
use super::reconcile::apply_abilities;

/// Behavior an event performs on its own, such as combat damage for
/// `afterAttack`.
pub type DefaultBehavior<'a> = &'a mut dyn FnMut(&mut GameState) -> ScriptResult<()>;

fn event_frame(
    state: &GameState,
    owner: EntityId,
    trigger: &TriggeredAbility,
    event: &GameEvent,
) -> Frame {
    let mut frame = owner_frame(state, owner, &trigger.action.frame);
    frame.it = event.object;
    frame.it_player = event.player;
    frame.that = event.undergoer;
    frame.source = trigger.source;
    frame
}

/// Whether a trigger's scope covers the event's subject: the agent
/// object itself, the player the event concerns, or the agent's hex.
fn in_scope(state: &GameState, scope: &Collection, event: &GameEvent) -> bool {
    match scope {
        Collection::Objects(_) => event.object.is_some_and(|id| scope.contains_object(id)),
        Collection::Players(_) => event.player.is_some_and(|p| scope.contains_player(p)),
        Collection::Hexes(hexes) => event
            .object
            .and_then(|id| state.locate(id))
            .is_some_and(|(_, hex)| hexes.contains(&hex)),
        Collection::CardsInHand(_) | Collection::CardsInDiscardPile(_) => false,
    }
}

/// Fire an event.
///
/// Triggers whose owner has left the board (or lost the trigger) by the
/// time their turn comes are skipped. Abilities are reconciled afterwards.
pub fn trigger_event(
    state: &mut GameState,
    event: &GameEvent,
    default: Option<DefaultBehavior<'_>>,
) -> ScriptResult<()> {
    let mut matched: Vec<(EntityId, TriggeredAbility)> = Vec::new();
    for (_, _, owner) in state.board_order() {
        let Some(object) = state.object(owner) else {
            continue;
        };
        let candidates: Vec<TriggeredAbility> = object
            .triggers
            .iter()
            .filter(|t| t.trigger.kind == event.kind && t.trigger.accepts_tag(event.tag.as_deref()))
            .cloned()
            .collect();
        for trigger in candidates {
            let frame = event_frame(state, owner, &trigger, event);
            let scope = script::evaluate_targets(state, &trigger.trigger.targets, frame)?;
            if in_scope(state, &scope, event) {
                matched.push((owner, trigger));
            }
        }
    }

    let overridden = matched.iter().any(|(_, t)| t.override_default);
    if !overridden {
        if let Some(default) = default {
            default(state)?;
        }
    }

    for (owner, trigger) in matched {
        let present = state
            .object(owner)
            .is_some_and(|o| o.triggers.iter().any(|t| t.id == trigger.id));
        if !present {
            continue;
        }
        log::trace!("{} fires on {owner}", event.kind);
        let frame = event_frame(state, owner, &trigger, event);
        script::invoke(state, &trigger.action, Vec::new(), frame)?;
    }

    apply_abilities(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::core::{GameConfig, PlayerColor, PlayerMap, TriggerKind};
    use crate::hex::HexId;
    use std::sync::Arc;

    #[test]
    fn test_scope_matches_subject() {
        let state = GameState::new(
            GameConfig::default(),
            Arc::new(CardRegistry::new()),
            PlayerMap::new(|c| c.name().to_string()),
            1,
        );
        let event = GameEvent::new(TriggerKind::AfterMoved)
            .with_object(EntityId(4))
            .with_player(PlayerColor::Blue);

        assert!(in_scope(&state, &Collection::Objects(vec![EntityId(4)]), &event));
        assert!(!in_scope(&state, &Collection::Objects(vec![EntityId(5)]), &event));
        assert!(in_scope(&state, &Collection::Players(vec![PlayerColor::Blue]), &event));
        assert!(!in_scope(&state, &Collection::Players(vec![PlayerColor::Orange]), &event));
        // The subject is not on the board, so no hex can contain it.
        assert!(!in_scope(&state, &Collection::Hexes(vec![HexId::origin()]), &event));
    }
}
