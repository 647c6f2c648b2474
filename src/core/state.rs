//! Game state and its derived views.
//!
//! ## GameState
//!
//! The complete, authoritative state of one battle:
//! - Both decks (fixed once a battle starts)
//! - Round counter, scores, and round history
//! - Live effects and ability usage
//! - Difficulty and the RNG state used by randomized abilities
//!
//! Uses `im` persistent data structures, so cloning is O(1) and the
//! reducer can return a wholly new state on every transition without
//! copying decks or history.
//!
//! ## Invariants
//!
//! - `current_round <= total_rounds`
//! - `player_score + bot_score + draws() == current_round`
//! - `round_results.len() == current_round`

use im::{OrdMap, Vector};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::rng::GameRngState;
use super::side::{Side, SidePair};
use crate::battle::{RoundPhase, RoundResult, RoundWinner};
use crate::cards::{Card, Element};
use crate::effects::{AbilityId, AbilityState, EffectKind, EffectRegistry};

/// Opponent strength, consumed by the external bot deck generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// An ability spent by a side this game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsedAbility {
    pub side: Side,
    pub ability: AbilityId,
}

/// Final tally for statistics collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub rounds_played: usize,
    pub player_score: u32,
    pub bot_score: u32,
    pub draws: u32,
    /// Overall winner once the game is over; `None` while in progress.
    pub outcome: Option<RoundWinner>,
    /// Elements the player fielded, in round order.
    pub player_elements: Vec<Element>,
}

/// Complete battle state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub player_deck: Vector<Card>,
    pub bot_deck: Vector<Card>,

    /// 0-based index of the next round to play.
    pub current_round: usize,
    /// Number of rounds in the battle (player deck length).
    pub total_rounds: usize,

    pub player_score: u32,
    pub bot_score: u32,
    /// Append-only round history.
    pub round_results: Vector<RoundResult>,

    pub difficulty: Difficulty,

    pub active_effects: EffectRegistry,
    pub player_abilities: Vector<AbilityState>,
    pub bot_abilities: Vector<AbilityState>,
    pub used_abilities: Vector<UsedAbility>,

    pub rng: GameRngState,
}

impl GameState {
    /// The idle initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Per-side accessors ===

    #[must_use]
    pub fn deck(&self, side: Side) -> &Vector<Card> {
        match side {
            Side::Player => &self.player_deck,
            Side::Bot => &self.bot_deck,
        }
    }

    #[must_use]
    pub fn abilities(&self, side: Side) -> &Vector<AbilityState> {
        match side {
            Side::Player => &self.player_abilities,
            Side::Bot => &self.bot_abilities,
        }
    }

    #[must_use]
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Bot => self.bot_score,
        }
    }

    // === Derived views ===

    /// All rounds have been played.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.total_rounds > 0 && self.current_round >= self.total_rounds
    }

    /// A battle has started and is not finished.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.current_round > 0 && !self.is_game_over()
    }

    #[must_use]
    pub fn round_phase(&self) -> RoundPhase {
        if self.total_rounds == 0 {
            RoundPhase::Idle
        } else if self.is_game_over() {
            RoundPhase::GameOver
        } else {
            RoundPhase::Pending {
                round: self.current_round,
            }
        }
    }

    /// Card `side` plays this round, or `None` once finished.
    #[must_use]
    pub fn current_card(&self, side: Side) -> Option<&Card> {
        if self.current_round >= self.total_rounds {
            return None;
        }
        self.deck(side).get(self.current_round)
    }

    /// Both cards of the current round, if it is playable.
    #[must_use]
    pub fn current_cards(&self) -> Option<SidePair<&Card>> {
        Some(SidePair::new(
            self.current_card(Side::Player)?,
            self.current_card(Side::Bot)?,
        ))
    }

    #[must_use]
    pub fn current_player_card(&self) -> Option<&Card> {
        self.current_card(Side::Player)
    }

    #[must_use]
    pub fn current_bot_card(&self) -> Option<&Card> {
        self.current_card(Side::Bot)
    }

    #[must_use]
    pub fn last_round_result(&self) -> Option<&RoundResult> {
        self.round_results.last()
    }

    #[must_use]
    pub fn draws(&self) -> u32 {
        self.round_results
            .iter()
            .filter(|r| r.winner == RoundWinner::Draw)
            .count() as u32
    }

    /// Check if `side` owns `ability` (a card in its deck carries it).
    #[must_use]
    pub fn owns(&self, side: Side, ability: AbilityId) -> bool {
        self.abilities(side).iter().any(|a| a.ability == ability)
    }

    /// Check if `side` already spent `ability` this game.
    #[must_use]
    pub fn has_used(&self, side: Side, ability: AbilityId) -> bool {
        self.used_abilities
            .iter()
            .any(|u| u.side == side && u.ability == ability)
    }

    #[must_use]
    pub fn is_sealed(&self, side: Side, ability: AbilityId) -> bool {
        self.active_effects.is_sealed(side, ability)
    }

    /// Latest live forecast produced for `side`.
    #[must_use]
    pub fn predictions(&self, side: Side) -> Option<&OrdMap<usize, RoundWinner>> {
        self.active_effects
            .for_side(side)
            .filter_map(|e| match &e.kind {
                EffectKind::Prediction { outcomes } => Some(outcomes),
                _ => None,
            })
            .last()
    }

    #[must_use]
    pub fn summary(&self) -> BattleSummary {
        let outcome = self.is_game_over().then(|| {
            crate::battle::compare(self.player_score as i32, self.bot_score as i32)
        });
        BattleSummary {
            rounds_played: self.current_round,
            player_score: self.player_score,
            bot_score: self.bot_score,
            draws: self.draws(),
            outcome,
            player_elements: self
                .round_results
                .iter()
                .map(|r| r.player_card.element)
                .collect(),
        }
    }

    /// Stable 64-bit fingerprint of the whole state.
    ///
    /// Two peers that applied the same actions produce the same digest.
    pub fn digest(&self) -> Result<u64, bincode::Error> {
        let bytes = bincode::serialize(self)?;
        let mut hasher = FxHasher::default();
        bytes.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

/// Distinct abilities carried by a deck, in first-appearance order.
#[must_use]
pub fn abilities_of(deck: &Vector<Card>) -> Vector<AbilityState> {
    let mut out: Vector<AbilityState> = Vector::new();
    for ability in deck.iter().filter_map(|c| c.ability) {
        if !out.iter().any(|a| a.ability == ability) {
            out.push_back(AbilityState::new(ability));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn deck(n: u32) -> Vector<Card> {
        (0..n)
            .map(|i| Card::new(CardId::new(i), format!("c{i}"), Element::Water))
            .collect()
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = GameState::new();

        assert_eq!(state.round_phase(), RoundPhase::Idle);
        assert!(!state.is_game_over());
        assert!(state.current_player_card().is_none());
        assert!(state.last_round_result().is_none());
        assert_eq!(state.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_current_cards_follow_round() {
        let state = GameState {
            player_deck: deck(3),
            bot_deck: deck(3),
            total_rounds: 3,
            current_round: 1,
            ..GameState::new()
        };

        assert_eq!(state.current_player_card().unwrap().id, CardId::new(1));
        assert_eq!(state.current_bot_card().unwrap().id, CardId::new(1));
        assert_eq!(state.round_phase(), RoundPhase::Pending { round: 1 });
    }

    #[test]
    fn test_game_over_hides_current_cards() {
        let state = GameState {
            player_deck: deck(2),
            bot_deck: deck(2),
            total_rounds: 2,
            current_round: 2,
            ..GameState::new()
        };

        assert!(state.is_game_over());
        assert!(state.current_player_card().is_none());
        assert_eq!(state.round_phase(), RoundPhase::GameOver);
    }

    #[test]
    fn test_abilities_of_deduplicates() {
        let cards: Vector<Card> = vec![
            Card::new(CardId::new(1), "a", Element::Fire).with_ability(AbilityId::Rally),
            Card::new(CardId::new(2), "b", Element::Fire),
            Card::new(CardId::new(3), "c", Element::Fire).with_ability(AbilityId::Hex),
            Card::new(CardId::new(4), "d", Element::Fire).with_ability(AbilityId::Rally),
        ]
        .into_iter()
        .collect();

        let abilities: Vec<_> = abilities_of(&cards).iter().map(|a| a.ability).collect();
        assert_eq!(abilities, vec![AbilityId::Rally, AbilityId::Hex]);
    }

    #[test]
    fn test_digest_is_stable_and_sensitive() {
        let a = GameState {
            player_deck: deck(2),
            total_rounds: 2,
            ..GameState::new()
        };
        let b = a.clone();
        let c = GameState {
            player_score: 1,
            ..a.clone()
        };

        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    }

    #[test]
    fn test_state_serde() {
        let state = GameState {
            player_deck: deck(2),
            total_rounds: 2,
            difficulty: Difficulty::Hard,
            ..GameState::new()
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
