//! Round resolution.
//!
//! A round moves `Pending -> Resolving -> Resolved` inside a single
//! reducer call:
//!
//! 1. Take `player_deck[current_round]` and `bot_deck[current_round]`.
//! 2. Apply the live effects scoped to each side.
//! 3. Compute damage in both directions.
//! 4. Higher final damage wins; equal damage is a draw. A forced
//!    outcome effect overrides the comparison.
//! 5. Emit a `RoundResult`.
//!
//! Aging effects and advancing the round counter belong to the reducer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::advantage::{advantage, Advantage};
use super::damage::{calculate_with, Damage};
use crate::cards::Card;
use crate::core::{GameState, Side};
use crate::effects::EffectRegistry;

/// Outcome of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundWinner {
    Player,
    Bot,
    Draw,
}

impl RoundWinner {
    /// Winner for a side.
    #[must_use]
    pub const fn side(side: Side) -> Self {
        match side {
            Side::Player => RoundWinner::Player,
            Side::Bot => RoundWinner::Bot,
        }
    }

    /// Winning side, or `None` for a draw.
    #[must_use]
    pub const fn winning_side(self) -> Option<Side> {
        match self {
            RoundWinner::Player => Some(Side::Player),
            RoundWinner::Bot => Some(Side::Bot),
            RoundWinner::Draw => None,
        }
    }
}

/// Where the battle stands with respect to round resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No decks loaded.
    Idle,
    /// A round is waiting to be played.
    Pending { round: usize },
    /// All rounds played.
    GameOver,
}

/// Immutable record of one resolved round.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundResult {
    /// 0-based index of the round.
    pub round: usize,
    /// Player card as fielded (after effects).
    pub player_card: Card,
    /// Bot card as fielded (after effects).
    pub bot_card: Card,
    /// Damage dealt by the player card to the bot card.
    pub player_damage: Damage,
    /// Damage dealt by the bot card to the player card.
    pub bot_damage: Damage,
    pub winner: RoundWinner,
    /// Whether the winner came from a forced outcome.
    #[serde(default)]
    pub forced: bool,
}

impl RoundResult {
    /// Damage dealt by `side`.
    #[must_use]
    pub fn damage_by(&self, side: Side) -> &Damage {
        match side {
            Side::Player => &self.player_damage,
            Side::Bot => &self.bot_damage,
        }
    }

    /// Advantage held by `side` this round.
    #[must_use]
    pub fn advantage_of(&self, side: Side) -> Advantage {
        self.damage_by(side).advantage
    }
}

/// Winner from a pair of final damages.
#[must_use]
pub fn compare(player_damage: i32, bot_damage: i32) -> RoundWinner {
    match player_damage.cmp(&bot_damage) {
        std::cmp::Ordering::Greater => RoundWinner::Player,
        std::cmp::Ordering::Less => RoundWinner::Bot,
        std::cmp::Ordering::Equal => RoundWinner::Draw,
    }
}

/// Resolve a matchup of two catalog cards under the given effects.
#[must_use]
pub fn resolve_matchup(
    round: usize,
    player: &Card,
    bot: &Card,
    effects: &EffectRegistry,
) -> RoundResult {
    let player_card = effects.apply(player, Side::Player);
    let bot_card = effects.apply(bot, Side::Bot);

    let adv_for = |side: Side, attacker: &Card, defender: &Card| {
        if effects.is_neutralized(side) {
            Advantage::Neutral
        } else {
            advantage(attacker.element, defender.element)
        }
    };
    let player_adv = adv_for(Side::Player, &player_card, &bot_card);
    let bot_adv = adv_for(Side::Bot, &bot_card, &player_card);

    let player_damage = calculate_with(&player_card, &bot_card, player_adv);
    let bot_damage = calculate_with(&bot_card, &player_card, bot_adv);

    let forced = effects.forced_outcome();
    let winner =
        forced.unwrap_or_else(|| compare(player_damage.final_damage, bot_damage.final_damage));

    RoundResult {
        round,
        player_card,
        bot_card,
        player_damage,
        bot_damage,
        winner,
        forced: forced.is_some(),
    }
}

/// Resolve the current round of `state`.
///
/// Returns `None` when the round index is out of range for either deck,
/// including once the game is over.
#[must_use]
pub fn resolve_round(state: &GameState) -> Option<RoundResult> {
    let cards = state.current_cards()?;
    let result = resolve_matchup(
        state.current_round,
        cards.player,
        cards.bot,
        &state.active_effects,
    );
    debug!(
        round = result.round,
        player_damage = result.player_damage.final_damage,
        bot_damage = result.bot_damage.final_damage,
        winner = ?result.winner,
        forced = result.forced,
        "round resolved"
    );
    Some(result)
}
