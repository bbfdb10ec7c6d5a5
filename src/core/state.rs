//! Game state: the authoritative match aggregate.
//!
//! ## PlayerState
//!
//! Per-color data: energy, hand, deck, discard pile, the player's half of
//! the board, selection and target-choice state, and a transient status
//! message for the UI.
//!
//! ## GameState
//!
//! Both players plus everything shared: whose turn it is, the seeded RNG,
//! the human-readable action log, the sound queue, the pending attack, the
//! pending targeting continuation, the `invalid` flag and the winner.
//!
//! All collections are `im` persistent structures, so cloning a state for
//! speculative execution is cheap.

use std::cell::Cell;
use std::sync::Arc;

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::entity::EntityId;
use super::object::Object;
use super::player::{PlayerColor, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Attribute, CardDefinition, CardInstance, CardRegistry};
use crate::error::Result;
use crate::formats::DraftState;
use crate::hex::HexId;

/// Nested attribute reads beyond this depth fall back to base values.
const MAX_ATTRIBUTE_DEPTH: u32 = 8;

/// A player's energy pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Energy {
    pub available: i64,
    pub total: i64,
}

/// One entry a player picked while answering a target prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChosenTarget {
    Hex(HexId),
    Card(EntityId),
}

/// The legal answers to an open target prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCandidates {
    Hexes(Vec<HexId>),
    Cards(Vec<EntityId>),
}

impl TargetCandidates {
    #[must_use]
    pub fn contains(&self, chosen: ChosenTarget) -> bool {
        match (self, chosen) {
            (TargetCandidates::Hexes(hexes), ChosenTarget::Hex(hex)) => hexes.contains(&hex),
            (TargetCandidates::Cards(cards), ChosenTarget::Card(id)) => cards.contains(&id),
            _ => false,
        }
    }
}

/// Target-choice progress for an interactive action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSelection {
    /// A prompt is open and waiting for the player.
    pub choosing: bool,
    pub candidates: Option<TargetCandidates>,
    /// Answers accumulated so far, consumed in order on re-execution.
    pub chosen: Vec<ChosenTarget>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Info,
    Error,
}

/// A transient message for the acting player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Where a card instance currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardZone {
    Hand,
    Deck,
    DiscardPile,
}

/// Per-player state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    pub color: PlayerColor,
    pub username: String,
    pub energy: Energy,
    pub hand: Vector<CardInstance>,
    /// Drawn from the front.
    pub deck: Vector<CardInstance>,
    pub discard_pile: Vector<CardInstance>,
    /// This player's objects. A hex appears in at most one player's board.
    pub board: OrdMap<HexId, Object>,
    pub selected_card: Option<usize>,
    pub selected_tile: Option<HexId>,
    pub target: TargetSelection,
    pub status: Option<StatusMessage>,
}

impl PlayerState {
    #[must_use]
    pub fn new(color: PlayerColor, username: impl Into<String>) -> Self {
        Self {
            color,
            username: username.into(),
            energy: Energy::default(),
            hand: Vector::new(),
            deck: Vector::new(),
            discard_pile: Vector::new(),
            board: OrdMap::new(),
            selected_card: None,
            selected_tile: None,
            target: TargetSelection::default(),
            status: None,
        }
    }

    /// Drop card/tile selection and any open target prompt.
    pub fn clear_selection(&mut self) {
        self.selected_card = None;
        self.selected_tile = None;
        self.target = TargetSelection::default();
    }

    fn zone(&self, zone: CardZone) -> &Vector<CardInstance> {
        match zone {
            CardZone::Hand => &self.hand,
            CardZone::Deck => &self.deck,
            CardZone::DiscardPile => &self.discard_pile,
        }
    }

    fn zone_mut(&mut self, zone: CardZone) -> &mut Vector<CardInstance> {
        match zone {
            CardZone::Hand => &mut self.hand,
            CardZone::Deck => &mut self.deck,
            CardZone::DiscardPile => &mut self.discard_pile,
        }
    }
}

/// An attack declared but not yet resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAttack {
    pub from: HexId,
    pub to: HexId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(PlayerColor),
    Draw,
}

/// A human-readable action log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub player: Option<PlayerColor>,
    pub text: String,
}

/// The action to re-run once the acting player answers a target prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    PlayEvent { card: EntityId },
    PlaceCard { card: EntityId, hex: HexId },
    ActivateAbility { hex: HexId, index: usize },
}

/// Complete match state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub registry: Arc<CardRegistry>,
    pub players: PlayerMap<PlayerState>,
    pub current_turn: PlayerColor,
    /// Starts at 0 and increments at every turn start.
    pub turn_number: u32,
    pub rng: GameRng,
    pub log: Vector<LogEntry>,
    sounds: Vector<String>,
    pub attack: Option<PendingAttack>,
    pub continuation: Option<Continuation>,
    /// Set when an effect could not legally complete.
    pub invalid: bool,
    pub winner: Option<Winner>,
    /// Whether the kernels are on the board and play has begun.
    pub started: bool,
    /// Both decks hold the same cards; a draw removes the card from both.
    pub shared_deck: bool,
    pub draft: Option<DraftState>,
    /// Player whose action is running speculatively; their `choose` calls prompt.
    pub interactive: Option<PlayerColor>,
    /// Next unconsumed entry in the interactive player's chosen list.
    pub choice_cursor: usize,
    next_entity: u32,
    #[serde(skip)]
    attribute_depth: Cell<u32>,
}

impl GameState {
    /// Create an empty match: no cards, no objects, orange to move.
    #[must_use]
    pub fn new(
        config: GameConfig,
        registry: Arc<CardRegistry>,
        usernames: PlayerMap<String>,
        seed: u64,
    ) -> Self {
        Self {
            config,
            registry,
            players: usernames.map(|color, name| PlayerState::new(color, name)),
            current_turn: PlayerColor::Orange,
            turn_number: 0,
            rng: GameRng::new(seed),
            log: Vector::new(),
            sounds: Vector::new(),
            attack: None,
            continuation: None,
            invalid: false,
            winner: None,
            started: false,
            shared_deck: false,
            draft: None,
            interactive: None,
            choice_cursor: 0,
            next_entity: 1,
            attribute_depth: Cell::new(0),
        }
    }

    /// Allocate a fresh entity ID.
    pub fn alloc_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity += 1;
        id
    }

    /// Create a new card instance with a fresh ID.
    pub fn new_card(&mut self, definition: Arc<CardDefinition>) -> CardInstance {
        let id = self.alloc_id();
        CardInstance::new(id, definition)
    }

    #[must_use]
    pub fn player(&self, color: PlayerColor) -> &PlayerState {
        &self.players[color]
    }

    pub fn player_mut(&mut self, color: PlayerColor) -> &mut PlayerState {
        &mut self.players[color]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    // === Board ===

    /// Every object as `(hex, controller, id)` in board iteration order
    /// (ascending hex, across both players).
    #[must_use]
    pub fn board_order(&self) -> Vec<(HexId, PlayerColor, EntityId)> {
        let mut entries: Vec<_> = self
            .players
            .iter()
            .flat_map(|(color, p)| p.board.iter().map(move |(hex, obj)| (*hex, color, obj.id)))
            .collect();
        entries.sort_by_key(|(hex, _, _)| *hex);
        entries
    }

    /// Where an object is and who controls it.
    #[must_use]
    pub fn locate(&self, id: EntityId) -> Option<(PlayerColor, HexId)> {
        self.players.iter().find_map(|(color, p)| {
            p.board
                .iter()
                .find(|(_, obj)| obj.id == id)
                .map(|(hex, _)| (color, *hex))
        })
    }

    #[must_use]
    pub fn object(&self, id: EntityId) -> Option<&Object> {
        let (color, hex) = self.locate(id)?;
        self.players[color].board.get(&hex)
    }

    pub fn object_mut(&mut self, id: EntityId) -> Option<&mut Object> {
        let (color, hex) = self.locate(id)?;
        self.players[color].board.get_mut(&hex)
    }

    #[must_use]
    pub fn object_at(&self, hex: HexId) -> Option<(PlayerColor, &Object)> {
        self.players
            .iter()
            .find_map(|(color, p)| p.board.get(&hex).map(|obj| (color, obj)))
    }

    #[must_use]
    pub fn is_occupied(&self, hex: HexId) -> bool {
        self.object_at(hex).is_some()
    }

    /// A player's kernel, if it is still on the board.
    #[must_use]
    pub fn kernel(&self, color: PlayerColor) -> Option<(HexId, EntityId)> {
        self.players[color]
            .board
            .iter()
            .find(|(_, obj)| obj.is_kernel())
            .map(|(hex, obj)| (*hex, obj.id))
    }

    // === Cards ===

    /// Find a card instance in any hand, deck or discard pile.
    #[must_use]
    pub fn find_card(&self, id: EntityId) -> Option<(PlayerColor, CardZone, usize)> {
        self.players.iter().find_map(|(color, p)| {
            [CardZone::Hand, CardZone::Deck, CardZone::DiscardPile]
                .into_iter()
                .find_map(|zone| {
                    p.zone(zone)
                        .iter()
                        .position(|c| c.id == id)
                        .map(|index| (color, zone, index))
                })
        })
    }

    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&CardInstance> {
        let (color, zone, index) = self.find_card(id)?;
        self.players[color].zone(zone).get(index)
    }

    /// Mutable access to a card; in a shared-deck match, a deck card is
    /// updated in both decks.
    pub fn update_card(&mut self, id: EntityId, f: impl Fn(&mut CardInstance)) -> bool {
        let mut found = false;
        for (_, player) in self.players.iter_mut() {
            for zone in [CardZone::Hand, CardZone::Deck, CardZone::DiscardPile] {
                for card in player.zone_mut(zone).iter_mut().filter(|c| c.id == id) {
                    f(card);
                    found = true;
                }
            }
        }
        found
    }

    /// Remove a card from wherever it is. Shared decks lose it from both sides.
    pub fn take_card(&mut self, id: EntityId) -> Option<(PlayerColor, CardInstance)> {
        let (color, zone, index) = self.find_card(id)?;
        let card = self.players[color].zone_mut(zone).remove(index);
        if self.shared_deck && zone == CardZone::Deck {
            let other = &mut self.players[color.opponent()].deck;
            if let Some(pos) = other.iter().position(|c| c.id == id) {
                other.remove(pos);
            }
        }
        Some((color, card))
    }

    /// Draw `count` cards from the front of a player's deck.
    ///
    /// A draw that would exceed the max hand size discards the top card
    /// instead. Drawing from an empty deck does nothing.
    pub fn draw_cards(&mut self, color: PlayerColor, count: usize) {
        for _ in 0..count {
            let Some(card) = self.players[color].deck.pop_front() else {
                break;
            };
            if self.shared_deck {
                let other = &mut self.players[color.opponent()].deck;
                if let Some(pos) = other.iter().position(|c| c.id == card.id) {
                    other.remove(pos);
                }
            }

            if self.players[color].hand.len() >= self.config.max_hand_size {
                let text = format!(
                    "{} discarded {} (hand full)",
                    self.players[color].username,
                    card.name()
                );
                self.players[color].discard_pile.push_back(card);
                self.log_message(Some(color), text);
            } else {
                self.players[color].hand.push_back(card);
            }
        }
    }

    // === Attributes ===

    /// Current value of an object's attribute: base value folded through
    /// its adjustments in order, clamped to `[0, max_stat]`.
    ///
    /// Returns `None` for a missing object or a stat the object lacks.
    #[must_use]
    pub fn attribute(&self, id: EntityId, attr: Attribute) -> Option<i64> {
        let obj = self.object(id)?;
        let base = obj.base_attribute(attr)?;
        if attr == Attribute::Cost {
            return Some(self.fold_adjustments(base, &obj.card.cost_adjustments, attr).max(0));
        }
        let value = self.fold_adjustments(base, &obj.adjustments, attr);
        Some(self.config.clamp_stat(value))
    }

    /// Current cost of a card instance, clamped at zero.
    #[must_use]
    pub fn card_cost(&self, card: &CardInstance) -> i64 {
        self.fold_adjustments(card.cost, &card.cost_adjustments, Attribute::Cost)
            .max(0)
    }

    fn fold_adjustments(
        &self,
        base: i64,
        adjustments: &[super::ability::StatAdjustment],
        attr: Attribute,
    ) -> i64 {
        let depth = self.attribute_depth.get();
        if depth >= MAX_ATTRIBUTE_DEPTH {
            log::warn!("attribute adjustments nested too deeply; using base value");
            return base;
        }
        self.attribute_depth.set(depth + 1);
        let mut value = base;
        for adj in adjustments.iter().filter(|a| a.attribute == attr) {
            match crate::script::eval_adjustment(self, &adj.func, value) {
                Ok(adjusted) => value = adjusted,
                Err(err) => log::warn!("skipping {attr} adjustment from {}: {err}", adj.ability),
            }
        }
        self.attribute_depth.set(depth);
        value
    }

    // === Log, sounds, status ===

    pub fn log_message(&mut self, player: Option<PlayerColor>, text: impl Into<String>) {
        self.log.push_back(LogEntry {
            turn: self.turn_number,
            player,
            text: text.into(),
        });
    }

    pub fn play_sound(&mut self, name: &str) {
        self.sounds.push_back(name.to_string());
    }

    /// Sounds queued since the last drain, oldest first.
    pub fn drain_sounds(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sounds).into_iter().collect()
    }

    pub fn set_status(&mut self, color: PlayerColor, kind: StatusKind, text: impl Into<String>) {
        self.players[color].status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    // === Victory ===

    /// Decide the winner from which kernels survive.
    ///
    /// Runs after every board mutation; once a winner is set it never changes.
    pub fn check_victory(&mut self) {
        if !self.started || self.winner.is_some() {
            return;
        }
        let orange = self.kernel(PlayerColor::Orange).is_some();
        let blue = self.kernel(PlayerColor::Blue).is_some();
        let winner = match (orange, blue) {
            (true, true) => return,
            (false, false) => Winner::Draw,
            (true, false) => Winner::Player(PlayerColor::Orange),
            (false, true) => Winner::Player(PlayerColor::Blue),
        };
        let text = match winner {
            Winner::Player(color) => format!("{} wins the game", self.players[color].username),
            Winner::Draw => "The game ends in a draw".to_string(),
        };
        log::debug!("game over: {winner:?}");
        self.winner = Some(winner);
        self.log_message(None, text);
        self.play_sound("win");
    }

    // === Snapshots ===

    /// Encode the full state with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_state() -> GameState {
        let usernames = PlayerMap::new(|c| c.name().to_string());
        GameState::new(GameConfig::default(), Arc::new(CardRegistry::new()), usernames, 1)
    }

    fn bot() -> Arc<CardDefinition> {
        Arc::new(CardDefinition::robot("Bot", 1, 1, 2, 1))
    }

    #[test]
    fn test_alloc_ids_are_unique() {
        let mut state = empty_state();
        let a = state.alloc_id();
        let b = state.alloc_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_draw_respects_max_hand_size() {
        let mut state = empty_state();
        state.config.max_hand_size = 1;
        for _ in 0..3 {
            let card = state.new_card(bot());
            state.player_mut(PlayerColor::Orange).deck.push_back(card);
        }

        state.draw_cards(PlayerColor::Orange, 2);

        let orange = state.player(PlayerColor::Orange);
        assert_eq!(orange.hand.len(), 1);
        assert_eq!(orange.discard_pile.len(), 1);
        assert_eq!(orange.deck.len(), 1);
    }

    #[test]
    fn test_shared_deck_draw_removes_from_both() {
        let mut state = empty_state();
        state.shared_deck = true;
        for _ in 0..2 {
            let card = state.new_card(bot());
            state.player_mut(PlayerColor::Orange).deck.push_back(card.clone());
            state.player_mut(PlayerColor::Blue).deck.push_back(card);
        }

        state.draw_cards(PlayerColor::Blue, 1);

        assert_eq!(state.player(PlayerColor::Orange).deck.len(), 1);
        assert_eq!(state.player(PlayerColor::Blue).deck.len(), 1);
        assert_eq!(state.player(PlayerColor::Blue).hand.len(), 1);
    }

    #[test]
    fn test_board_order_spans_players() {
        let mut state = empty_state();
        let far = HexId::new(2, 0);
        let near = HexId::new(-1, 0);
        for (color, hex) in [(PlayerColor::Orange, far), (PlayerColor::Blue, near)] {
            let card = state.new_card(bot());
            let id = state.alloc_id();
            state.player_mut(color).board.insert(hex, Object::new(id, card));
        }

        let order: Vec<_> = state.board_order().into_iter().map(|(h, c, _)| (h, c)).collect();
        assert_eq!(order, vec![(near, PlayerColor::Blue), (far, PlayerColor::Orange)]);
    }

    #[test]
    fn test_victory_requires_started_game() {
        let mut state = empty_state();
        state.check_victory();
        assert_eq!(state.winner, None);

        state.started = true;
        state.check_victory();
        assert_eq!(state.winner, Some(Winner::Draw));
    }

    #[test]
    fn test_drain_sounds() {
        let mut state = empty_state();
        state.play_sound("attack");
        state.play_sound("damage");

        assert_eq!(state.drain_sounds(), vec!["attack", "damage"]);
        assert!(state.drain_sounds().is_empty());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = empty_state();
        let card = state.new_card(bot());
        state.player_mut(PlayerColor::Blue).hand.push_back(card);
        state.log_message(None, "hello");

        let bytes = state.to_bytes().unwrap();
        let restored = GameState::from_bytes(&bytes).unwrap();

        assert_eq!(restored.player(PlayerColor::Blue).hand.len(), 1);
        assert_eq!(restored.log.len(), 1);
        assert_eq!(restored.to_bytes().unwrap(), bytes);
    }
}
