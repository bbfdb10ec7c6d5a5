//! Resolve target descriptors against the game state.
//!
//! All results are ordered deterministically: board objects and hexes in
//! ascending hex order, cards in hand or pile order, players in turn
//! order. `choose` and `random` rely on that ordering to be reproducible.
//!
//! ## Player redirection
//!
//! Wherever an object is expected and a `Players` collection is given,
//! the players' kernels stand in for them. `dealDamage(targets.opponent(), 2)`
//! therefore damages the opposing kernel.

use super::collection::{Collection, CollectionKind};
use super::condition::{all_match_card, all_match_hex, Condition};
use crate::cards::CardType;
use crate::core::{
    CardZone, ChosenTarget, EntityId, GameState, PlayerColor, TargetCandidates,
};
use crate::error::{ScriptError, ScriptResult};
use crate::hex::HexId;

/// Type filter for object and card helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeFilter {
    Any,
    Only(CardType),
}

impl TypeFilter {
    /// Parse `"robot"`, `"structure"`, `"kernel"`/`"core"`, `"event"`, or one
    /// of the wildcards `"allobjects"` and `"anycard"`.
    pub fn parse(name: &str) -> ScriptResult<Self> {
        match name {
            "allobjects" | "anycard" => Ok(TypeFilter::Any),
            other => other.parse().map(TypeFilter::Only),
        }
    }

    #[must_use]
    pub fn accepts(self, card_type: CardType) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Only(t) => t == card_type,
        }
    }
}

/// Board positions a collection refers to.
///
/// Objects map to their hexes, players to their kernels' hexes; card
/// collections have no position.
#[must_use]
pub fn positions(state: &GameState, collection: &Collection) -> Vec<HexId> {
    match collection {
        Collection::Objects(ids) => ids
            .iter()
            .filter_map(|id| state.locate(*id).map(|(_, hex)| hex))
            .collect(),
        Collection::Hexes(hexes) => hexes.clone(),
        Collection::Players(players) => players
            .iter()
            .filter_map(|p| state.kernel(*p).map(|(hex, _)| hex))
            .collect(),
        Collection::CardsInHand(_) | Collection::CardsInDiscardPile(_) => Vec::new(),
    }
}

/// Board objects referred to by a collection, for an action that needs objects.
///
/// Players redirect to kernels and hexes to their occupants. Objects no
/// longer on the board are skipped. Card collections are rejected.
pub fn object_ids(
    state: &GameState,
    collection: &Collection,
    action: &'static str,
) -> ScriptResult<Vec<EntityId>> {
    match collection {
        Collection::Objects(ids) => Ok(ids
            .iter()
            .copied()
            .filter(|id| state.locate(*id).is_some())
            .collect()),
        Collection::Players(players) => Ok(players
            .iter()
            .filter_map(|p| state.kernel(*p).map(|(_, id)| id))
            .collect()),
        Collection::Hexes(hexes) => Ok(hexes
            .iter()
            .filter_map(|hex| state.object_at(*hex).map(|(_, obj)| obj.id))
            .collect()),
        other => Err(ScriptError::TargetKindMismatch {
            action,
            expected: CollectionKind::Objects.name(),
            found: other.kind().name(),
        }),
    }
}

/// Players referred to by a collection. Objects map to their controllers.
pub fn player_colors(
    state: &GameState,
    collection: &Collection,
    action: &'static str,
) -> ScriptResult<Vec<PlayerColor>> {
    match collection {
        Collection::Players(players) => Ok(players.clone()),
        Collection::Objects(_) => Ok(controller_of(state, collection)),
        other => Err(ScriptError::TargetKindMismatch {
            action,
            expected: CollectionKind::Players.name(),
            found: other.kind().name(),
        }),
    }
}

/// Distinct controllers of the objects in a collection, in order.
#[must_use]
pub fn controller_of(state: &GameState, collection: &Collection) -> Vec<PlayerColor> {
    let mut players = Vec::new();
    for id in collection.entity_ids() {
        if let Some((color, _)) = state.locate(*id) {
            if !players.contains(&color) {
                players.push(color);
            }
        }
    }
    players
}

/// Board objects of the given types matching every condition.
pub fn objects_matching(
    state: &GameState,
    types: &[TypeFilter],
    conditions: &[Condition],
) -> ScriptResult<Collection> {
    let mut ids = Vec::new();
    for (hex, _, id) in state.board_order() {
        let Some(obj) = state.object(id) else {
            continue;
        };
        if !types.iter().any(|t| t.accepts(obj.card_type())) {
            continue;
        }
        if all_match_hex(conditions, state, hex)? {
            ids.push(id);
        }
    }
    Ok(Collection::Objects(ids))
}

/// Cards in the given players' hands or discard piles.
pub fn cards_in_zone(
    state: &GameState,
    zone: CardZone,
    players: &[PlayerColor],
    filter: TypeFilter,
    conditions: &[Condition],
) -> ScriptResult<Collection> {
    let mut ids = Vec::new();
    for &color in players {
        let player = state.player(color);
        let cards = match zone {
            CardZone::Hand => &player.hand,
            CardZone::DiscardPile => &player.discard_pile,
            CardZone::Deck => &player.deck,
        };
        for card in cards {
            if filter.accepts(card.card_type()) && all_match_card(conditions, state, color, card)? {
                ids.push(card.id);
            }
        }
    }
    Ok(match zone {
        CardZone::DiscardPile => Collection::CardsInDiscardPile(ids),
        _ => Collection::CardsInHand(ids),
    })
}

/// Every hex on the board.
#[must_use]
pub fn all_tiles(state: &GameState) -> Collection {
    Collection::Hexes(state.config.grid().all_hexes())
}

/// Hexes matching every condition.
pub fn tiles_matching(state: &GameState, conditions: &[Condition]) -> ScriptResult<Collection> {
    let mut hexes = Vec::new();
    for hex in state.config.grid().all_hexes() {
        if all_match_hex(conditions, state, hex)? {
            hexes.push(hex);
        }
    }
    Ok(Collection::Hexes(hexes))
}

/// Pick `amount` entries at random, preserving collection order.
pub fn random(state: &mut GameState, collection: &Collection, amount: usize) -> Collection {
    let indices = state.rng.sample_indices(collection.len(), amount);
    collection.select(&indices)
}

/// Resolve `targets.choose`.
///
/// With no candidates the effect cannot complete and `invalid` is set.
/// When `chooser` is the player running an interactive action, answers
/// are consumed from their chosen list; if the list runs out, a prompt
/// is opened and the partial result is returned. Anyone else's choice
/// falls back to seeded random sampling.
pub fn choose(
    state: &mut GameState,
    chooser: PlayerColor,
    collection: &Collection,
    amount: usize,
) -> Collection {
    let entries = prompt_entries(state, collection);
    if entries.is_empty() {
        state.invalid = true;
        return Collection::empty(collection.kind());
    }
    if state.interactive != Some(chooser) {
        let indices = state.rng.sample_indices(entries.len(), amount.max(1));
        let picked: Vec<usize> = indices.iter().map(|&i| entries[i].0).collect();
        return collection.select(&picked);
    }
    if state.player(chooser).target.choosing {
        return Collection::empty(collection.kind());
    }

    let wanted = amount.max(1).min(entries.len());
    let mut picked: Vec<usize> = Vec::new();
    while picked.len() < wanted {
        let cursor = state.choice_cursor;
        let Some(answer) = state.player(chooser).target.chosen.get(cursor).copied() else {
            let open: Vec<ChosenTarget> = entries
                .iter()
                .filter(|(index, _)| !picked.contains(index))
                .map(|(_, entry)| *entry)
                .collect();
            log::debug!("{chooser} must choose from {} candidate(s)", open.len());
            let target = &mut state.player_mut(chooser).target;
            target.choosing = true;
            target.candidates = Some(candidates_for(collection.kind(), open));
            return collection.select(&picked);
        };
        state.choice_cursor += 1;
        let hit = entries
            .iter()
            .find(|(index, entry)| *entry == answer && !picked.contains(index));
        match hit {
            Some((index, _)) => picked.push(*index),
            None => {
                state.invalid = true;
                return collection.select(&picked);
            }
        }
    }
    collection.select(&picked)
}

/// How each choosable entry of a collection is answered: cards by ID,
/// everything else by clicking its hex. Entries with no board position
/// are left out.
fn prompt_entries(state: &GameState, collection: &Collection) -> Vec<(usize, ChosenTarget)> {
    match collection {
        Collection::CardsInHand(ids) | Collection::CardsInDiscardPile(ids) => ids
            .iter()
            .enumerate()
            .map(|(i, id)| (i, ChosenTarget::Card(*id)))
            .collect(),
        Collection::Objects(_) | Collection::Players(_) | Collection::Hexes(_) => collection
            .split()
            .iter()
            .enumerate()
            .filter_map(|(i, single)| {
                positions(state, single)
                    .first()
                    .map(|hex| (i, ChosenTarget::Hex(*hex)))
            })
            .collect(),
    }
}

fn candidates_for(kind: CollectionKind, open: Vec<ChosenTarget>) -> TargetCandidates {
    match kind {
        CollectionKind::CardsInHand | CollectionKind::CardsInDiscardPile => TargetCandidates::Cards(
            open.into_iter()
                .filter_map(|c| match c {
                    ChosenTarget::Card(id) => Some(id),
                    ChosenTarget::Hex(_) => None,
                })
                .collect(),
        ),
        _ => TargetCandidates::Hexes(
            open.into_iter()
                .filter_map(|c| match c {
                    ChosenTarget::Hex(hex) => Some(hex),
                    ChosenTarget::Card(_) => None,
                })
                .collect(),
        ),
    }
}
