//! Reducer actions.
//!
//! `GameAction` is the closed set of transitions the reducer accepts.
//! Actions serialize as `{"type": ..., "payload": ...}` so they can be
//! carried verbatim inside a `GameMessage` to a remote peer.
//!
//! An unrecognized `type` decodes to `GameAction::Unknown`, which the
//! reducer treats as a no-op.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::side::Side;
use super::state::Difficulty;
use crate::cards::Card;
use crate::effects::{AbilityId, ActiveEffect};

/// A state transition request.
///
/// ## Example
///
/// ```
/// use elemental_clash::core::GameAction;
///
/// let json = serde_json::to_string(&GameAction::PlayRound).unwrap();
/// assert_eq!(json, r#"{"type":"PLAY_ROUND"}"#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameAction {
    /// Load the player deck; also sets `total_rounds`.
    SetPlayerDeck(Vector<Card>),
    SetBotDeck(Vector<Card>),
    /// Reset rounds, scores, history, effects and ability usage.
    StartBattle,
    PlayRound,
    SetDifficulty(Difficulty),
    /// Return to the initial state.
    ResetGame,
    /// Seed the RNG used by randomized abilities.
    SetSeed(u64),
    InvokeAbility { side: Side, ability: AbilityId },
    AddEffect(ActiveEffect),
    ClearEffects,
    #[serde(other)]
    Unknown,
}

impl GameAction {
    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GameAction::SetPlayerDeck(_) => "set_player_deck",
            GameAction::SetBotDeck(_) => "set_bot_deck",
            GameAction::StartBattle => "start_battle",
            GameAction::PlayRound => "play_round",
            GameAction::SetDifficulty(_) => "set_difficulty",
            GameAction::ResetGame => "reset_game",
            GameAction::SetSeed(_) => "set_seed",
            GameAction::InvokeAbility { .. } => "invoke_ability",
            GameAction::AddEffect(_) => "add_effect",
            GameAction::ClearEffects => "clear_effects",
            GameAction::Unknown => "unknown",
        }
    }
}

/// Where a dispatched action came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionOrigin {
    Local,
    Remote,
}

/// A dispatched action with metadata, for history and replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Dispatch order within the store.
    pub sequence: u64,
    pub origin: ActionOrigin,
    pub action: GameAction,
}

impl ActionRecord {
    #[must_use]
    pub fn new(sequence: u64, origin: ActionOrigin, action: GameAction) -> Self {
        Self {
            sequence,
            origin,
            action,
        }
    }
}
