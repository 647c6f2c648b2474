//! The game store.
//!
//! `GameStore` owns the current `GameState` and the log of actions that
//! produced it. It is an ordinary value: create one per session, hand it
//! to whatever drives play, and call `reset` to start over. All changes
//! go through `dispatch`/`dispatch_remote`, which run the pure reducer.

use im::Vector;
use tracing::trace;

use super::action::{ActionOrigin, ActionRecord, GameAction};
use super::state::GameState;
use crate::rules::reduce;

/// Constructible, explicitly reset state holder.
#[derive(Clone, Debug, Default)]
pub struct GameStore {
    state: GameState,
    history: Vector<ActionRecord>,
    next_sequence: u64,
}

impl GameStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store starting from an existing state, with empty history.
    #[must_use]
    pub fn with_state(state: GameState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Every dispatched action, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Apply a locally originated action.
    pub fn dispatch(&mut self, action: GameAction) -> &GameState {
        self.apply(ActionOrigin::Local, action)
    }

    /// Apply an action received from a remote peer.
    pub fn dispatch_remote(&mut self, action: GameAction) -> &GameState {
        self.apply(ActionOrigin::Remote, action)
    }

    /// Return to the initial state and forget history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn apply(&mut self, origin: ActionOrigin, action: GameAction) -> &GameState {
        self.state = reduce(&self.state, &action);
        trace!(
            sequence = self.next_sequence,
            ?origin,
            action = action.label(),
            round = self.state.current_round,
            "action applied"
        );
        self.history
            .push_back(ActionRecord::new(self.next_sequence, origin, action));
        self.next_sequence += 1;
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, Element};

    fn deck() -> Vector<Card> {
        (0..2)
            .map(|i| Card::new(CardId::new(i), "c", Element::Earth).with_attack(10))
            .collect()
    }

    #[test]
    fn test_dispatch_records_history() {
        let mut store = GameStore::new();
        store.dispatch(GameAction::SetPlayerDeck(deck()));
        store.dispatch_remote(GameAction::SetBotDeck(deck()));

        let origins: Vec<_> = store.history().iter().map(|r| r.origin).collect();
        assert_eq!(origins, vec![ActionOrigin::Local, ActionOrigin::Remote]);
        assert_eq!(store.history()[1].sequence, 1);
        assert_eq!(store.state().total_rounds, 2);
    }

    #[test]
    fn test_history_replays_to_current_state() {
        let mut store = GameStore::new();
        store.dispatch(GameAction::SetPlayerDeck(deck()));
        store.dispatch(GameAction::SetBotDeck(deck()));
        store.dispatch(GameAction::StartBattle);
        store.dispatch(GameAction::PlayRound);

        let actions: Vec<_> = store.history().iter().map(|r| r.action.clone()).collect();
        let replayed = crate::rules::replay(&GameState::new(), &actions);
        assert_eq!(&replayed, store.state());
    }

    #[test]
    fn test_reset() {
        let mut store = GameStore::new();
        store.dispatch(GameAction::SetPlayerDeck(deck()));
        store.reset();

        assert_eq!(store.state(), &GameState::new());
        assert!(store.history().is_empty());
    }
}
