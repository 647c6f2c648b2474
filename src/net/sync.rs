//! Peer synchronization over a `ReconnectingChannel`.
//!
//! Both peers run the same reducer. A `SyncSession` applies local actions
//! to its store and forwards them as `ACTION` messages; inbound `ACTION`
//! messages are applied as remote dispatches. After every locally played
//! round it also sends a `STATE_DIGEST`, and an inbound digest for the
//! round the local state is on is compared against the local digest.
//! A mismatch is logged and counted; it is never repaired automatically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::channel::{Delivery, ReconnectingChannel, Subscription};
use super::error::{ChannelError, SyncError};
use super::message::{GameMessage, ACTION, PING, STATE_DIGEST};
use super::transport::Transport;
use crate::core::{GameAction, GameState, GameStore};

/// Payload of a `STATE_DIGEST` message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDigest {
    /// Rounds played when the digest was taken.
    pub round: usize,
    pub digest: u64,
}

/// Shared handle to a store.
pub type SharedStore = Arc<Mutex<GameStore>>;

fn lock(store: &SharedStore) -> MutexGuard<'_, GameStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps a local `GameStore` in step with a remote peer.
pub struct SyncSession<T: Transport> {
    channel: ReconnectingChannel<T>,
    store: SharedStore,
    desyncs: Arc<AtomicU64>,
    subscription: Subscription,
}

impl<T: Transport> SyncSession<T> {
    /// Attach `store` to `channel`. The channel may be connected before or
    /// after.
    #[must_use]
    pub fn new(channel: ReconnectingChannel<T>, store: SharedStore) -> Self {
        let desyncs = Arc::new(AtomicU64::new(0));
        let subscription = {
            let store = Arc::clone(&store);
            let desyncs = Arc::clone(&desyncs);
            channel.subscribe(move |message| {
                handle_inbound(&store, &desyncs, message).map_err(Into::into)
            })
        };
        Self {
            channel,
            store,
            desyncs,
            subscription,
        }
    }

    #[must_use]
    pub fn channel(&self) -> &ReconnectingChannel<T> {
        &self.channel
    }

    #[must_use]
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        lock(&self.store).state().clone()
    }

    /// Digest mismatches observed so far.
    #[must_use]
    pub fn desyncs(&self) -> u64 {
        self.desyncs.load(Ordering::Relaxed)
    }

    /// Apply `action` locally and forward it to the peer.
    ///
    /// The local state changes even if the peer is unreachable; the
    /// returned `Delivery` says whether the action went out.
    pub fn dispatch(&self, action: GameAction) -> Result<Delivery, SyncError> {
        let message = GameMessage::action(&action).map_err(ChannelError::from)?;
        let played = matches!(action, GameAction::PlayRound);

        let digest = {
            let mut store = lock(&self.store);
            let before = store.state().current_round;
            let state = store.dispatch(action);
            if played && state.current_round > before {
                Some(StateDigest {
                    round: state.current_round,
                    digest: state.digest()?,
                })
            } else {
                None
            }
        };

        let delivery = self.channel.send(&message)?;
        if let Some(digest) = digest {
            let message =
                GameMessage::with_payload(STATE_DIGEST, &digest).map_err(ChannelError::from)?;
            self.channel.send(&message)?;
        }
        Ok(delivery)
    }
}

impl<T: Transport> Drop for SyncSession<T> {
    fn drop(&mut self) {
        self.channel.unsubscribe(self.subscription);
    }
}

fn handle_inbound(
    store: &SharedStore,
    desyncs: &AtomicU64,
    message: &GameMessage,
) -> Result<(), SyncError> {
    match message.kind.as_str() {
        ACTION => {
            let action: GameAction = message.decode()?;
            debug!(action = action.label(), "remote action");
            lock(store).dispatch_remote(action);
        }
        STATE_DIGEST => {
            let remote: StateDigest = message.decode()?;
            let store = lock(store);
            let state = store.state();
            if state.current_round != remote.round {
                debug!(
                    local = state.current_round,
                    remote = remote.round,
                    "digest for another round skipped"
                );
                return Ok(());
            }
            let local = state.digest()?;
            if local != remote.digest {
                desyncs.fetch_add(1, Ordering::Relaxed);
                warn!(round = remote.round, local, remote = remote.digest, "peer state diverged");
            }
        }
        PING => {}
        other => debug!(kind = other, "unhandled message"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SharedStore {
        Arc::new(Mutex::new(GameStore::new()))
    }

    #[test]
    fn test_inbound_action_is_remote() {
        let store = store();
        let desyncs = AtomicU64::new(0);
        let message = GameMessage::action(&GameAction::SetSeed(9)).unwrap();

        handle_inbound(&store, &desyncs, &message).unwrap();

        let store = lock(&store);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].origin, crate::core::ActionOrigin::Remote);
    }

    #[test]
    fn test_digest_mismatch_counts() {
        let store = store();
        let desyncs = AtomicU64::new(0);
        let local = lock(&store).state().digest().unwrap();

        let same = GameMessage::with_payload(STATE_DIGEST, &StateDigest { round: 0, digest: local })
            .unwrap();
        handle_inbound(&store, &desyncs, &same).unwrap();
        assert_eq!(desyncs.load(Ordering::Relaxed), 0);

        let other = GameMessage::with_payload(
            STATE_DIGEST,
            &StateDigest {
                round: 0,
                digest: local.wrapping_add(1),
            },
        )
        .unwrap();
        handle_inbound(&store, &desyncs, &other).unwrap();
        assert_eq!(desyncs.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_bad_action_payload_is_error() {
        let store = store();
        let desyncs = AtomicU64::new(0);
        let message = GameMessage::new(ACTION, serde_json::json!(42));

        assert!(matches!(
            handle_inbound(&store, &desyncs, &message),
            Err(SyncError::Decode(_))
        ));
        assert!(lock(&store).history().is_empty());
    }
}
