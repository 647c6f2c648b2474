//! The game reducer.
//!
//! `reduce` is a total, pure function `(state, action) -> state`. It
//! never mutates its input and never fails: an action that does not make
//! sense in the current state (a stale ability, a round past the end, an
//! unknown tag) returns the input unchanged. That keeps replayed or
//! duplicated remote actions harmless.

use tracing::debug;

use crate::battle::{resolve_round, RoundWinner};
use crate::core::{abilities_of, GameAction, GameRngState, GameState};
use crate::effects::{self, EffectRegistry};

/// Apply `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(state: &GameState, action: &GameAction) -> GameState {
    match action {
        GameAction::SetPlayerDeck(deck) => {
            if state.is_in_progress() {
                debug!(action = action.label(), "deck change ignored mid-battle");
                return state.clone();
            }
            let next = GameState {
                player_deck: deck.clone(),
                total_rounds: deck.len(),
                ..state.clone()
            };
            start_battle(&next)
        }
        GameAction::SetBotDeck(deck) => {
            if state.is_in_progress() {
                debug!(action = action.label(), "deck change ignored mid-battle");
                return state.clone();
            }
            let next = GameState {
                bot_deck: deck.clone(),
                ..state.clone()
            };
            start_battle(&next)
        }
        GameAction::StartBattle => start_battle(state),
        GameAction::PlayRound => play_round(state),
        GameAction::SetDifficulty(difficulty) => GameState {
            difficulty: *difficulty,
            ..state.clone()
        },
        GameAction::ResetGame => GameState::new(),
        GameAction::SetSeed(seed) => GameState {
            rng: GameRngState::seeded(*seed),
            ..state.clone()
        },
        GameAction::InvokeAbility { side, ability } => {
            effects::invoke(state, *side, *ability).unwrap_or_else(|rejection| {
                debug!(%side, %ability, %rejection, "ability rejected");
                state.clone()
            })
        }
        GameAction::AddEffect(effect) => GameState {
            active_effects: state.active_effects.with(effect.clone()),
            ..state.clone()
        },
        GameAction::ClearEffects => GameState {
            active_effects: EffectRegistry::new(),
            ..state.clone()
        },
        GameAction::Unknown => {
            debug!("unknown action ignored");
            state.clone()
        }
    }
}

/// Fold a sequence of actions over `state`.
#[must_use]
pub fn replay<'a>(state: &GameState, actions: impl IntoIterator<Item = &'a GameAction>) -> GameState {
    actions
        .into_iter()
        .fold(state.clone(), |acc, action| reduce(&acc, action))
}

/// Clear battle progress, keeping decks, difficulty and RNG.
fn start_battle(state: &GameState) -> GameState {
    GameState {
        current_round: 0,
        player_score: 0,
        bot_score: 0,
        round_results: Default::default(),
        active_effects: EffectRegistry::new(),
        player_abilities: abilities_of(&state.player_deck),
        bot_abilities: abilities_of(&state.bot_deck),
        used_abilities: Default::default(),
        ..state.clone()
    }
}

fn play_round(state: &GameState) -> GameState {
    let Some(result) = resolve_round(state) else {
        debug!(
            round = state.current_round,
            total = state.total_rounds,
            "no round to play"
        );
        return state.clone();
    };

    let mut next = state.clone();
    match result.winner {
        RoundWinner::Player => next.player_score += 1,
        RoundWinner::Bot => next.bot_score += 1,
        RoundWinner::Draw => {}
    }
    next.round_results.push_back(result);
    next.active_effects = state.active_effects.aged();
    next.current_round += 1;
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, Element};
    use crate::core::{Difficulty, Side};
    use crate::effects::{AbilityId, ActiveEffect, TargetSide, TargetStat};
    use im::Vector;

    fn deck(cards: &[(i32, i32, Element)]) -> Vector<Card> {
        cards
            .iter()
            .enumerate()
            .map(|(i, &(attack, defense, element))| {
                Card::new(CardId::new(i as u32), format!("c{i}"), element)
                    .with_attack(attack)
                    .with_defense(defense)
            })
            .collect()
    }

    fn ready() -> GameState {
        let player = deck(&[(28, 18, Element::Fire), (20, 10, Element::Fire)]);
        let bot = deck(&[(20, 10, Element::Lightning), (20, 10, Element::Ice)]);
        let state = reduce(&GameState::new(), &GameAction::SetPlayerDeck(player));
        let state = reduce(&state, &GameAction::SetBotDeck(bot));
        reduce(&state, &GameAction::StartBattle)
    }

    #[test]
    fn test_set_player_deck_derives_total_rounds() {
        let state = ready();
        assert_eq!(state.total_rounds, 2);
        assert_eq!(state.current_round, 0);
    }

    #[test]
    fn test_play_round_scores_and_advances() {
        let state = reduce(&ready(), &GameAction::PlayRound);

        assert_eq!(state.current_round, 1);
        assert_eq!(state.player_score, 1);
        assert_eq!(state.bot_score, 0);
        assert_eq!(state.round_results.len(), 1);
        assert_eq!(state.last_round_result().unwrap().player_damage.final_damage, 18);
    }

    #[test]
    fn test_play_round_past_end_is_noop() {
        let state = ready();
        let state = reduce(&state, &GameAction::PlayRound);
        let state = reduce(&state, &GameAction::PlayRound);
        assert!(state.is_game_over());

        let after = reduce(&state, &GameAction::PlayRound);
        assert_eq!(after, state);
    }

    #[test]
    fn test_input_state_is_never_mutated() {
        let state = ready();
        let snapshot = state.clone();
        let _ = reduce(&state, &GameAction::PlayRound);

        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_start_battle_preserves_decks_and_difficulty() {
        let state = reduce(&ready(), &GameAction::SetDifficulty(Difficulty::Hard));
        let played = reduce(&state, &GameAction::PlayRound);
        let restarted = reduce(&played, &GameAction::StartBattle);

        assert_eq!(restarted.current_round, 0);
        assert_eq!(restarted.player_score, 0);
        assert!(restarted.round_results.is_empty());
        assert_eq!(restarted.difficulty, Difficulty::Hard);
        assert_eq!(restarted.player_deck, state.player_deck);
    }

    #[test]
    fn test_deck_change_ignored_mid_battle() {
        let state = reduce(&ready(), &GameAction::PlayRound);
        let next = reduce(&state, &GameAction::SetPlayerDeck(Vector::new()));

        assert_eq!(next, state);
    }

    #[test]
    fn test_effects_age_after_resolution() {
        let effect = ActiveEffect::buff(TargetSide::Bot, TargetStat::Attack, 30, 1, AbilityId::BattleCry);
        let state = reduce(&ready(), &GameAction::AddEffect(effect));
        let state = reduce(&state, &GameAction::PlayRound);

        assert_eq!(state.bot_score, 1);
        assert!(state.active_effects.is_empty());
    }

    #[test]
    fn test_reset_returns_initial_state() {
        let state = reduce(&ready(), &GameAction::PlayRound);
        assert_eq!(reduce(&state, &GameAction::ResetGame), GameState::new());
    }

    #[test]
    fn test_unknown_is_noop() {
        let state = ready();
        assert_eq!(reduce(&state, &GameAction::Unknown), state);
    }

    #[test]
    fn test_rejected_ability_is_noop() {
        let state = ready();
        let action = GameAction::InvokeAbility {
            side: Side::Player,
            ability: AbilityId::Rally,
        };
        assert_eq!(reduce(&state, &action), state);
    }

    #[test]
    fn test_replay_matches_sequential_reduce() {
        let actions = [GameAction::PlayRound, GameAction::SetSeed(7), GameAction::PlayRound];
        let start = ready();

        let folded = replay(&start, &actions);
        let manual = reduce(&reduce(&reduce(&start, &actions[0]), &actions[1]), &actions[2]);
        assert_eq!(folded, manual);
    }
}
