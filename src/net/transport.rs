//! Transport seam.
//!
//! A `Transport` opens a `Link`: a pair of text-frame queues, one frame
//! per message. The inbound queue ending (`recv` returning `None`) means
//! the transport closed. Real hosts implement `Transport` over a
//! websocket; `MemoryHub` is an in-process relay for local play and tests.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::trace;

use super::error::TransportError;

/// An open duplex connection.
#[derive(Debug)]
pub struct Link {
    pub outbound: mpsc::UnboundedSender<String>,
    pub inbound: mpsc::UnboundedReceiver<String>,
}

impl Link {
    /// Two links wired back to back.
    #[must_use]
    pub fn pair() -> (Link, Link) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (
            Link {
                outbound: a_tx,
                inbound: b_rx,
            },
            Link {
                outbound: b_tx,
                inbound: a_rx,
            },
        )
    }
}

/// Something that can open links.
pub trait Transport: Send + Sync + 'static {
    /// Open a new link. Completes when the link is usable.
    fn open(&self) -> impl Future<Output = Result<Link, TransportError>> + Send;
}

// === In-memory relay ===

#[derive(Debug, Default)]
struct HubState {
    peers: Vec<(u64, mpsc::UnboundedSender<String>)>,
    next_peer: u64,
    refusing: bool,
}

/// Relay that forwards every frame to all other connected peers.
///
/// Cloning shares the hub.
#[derive(Clone, Debug, Default)]
pub struct MemoryHub {
    state: Arc<Mutex<HubState>>,
}

impl MemoryHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of peers currently attached.
    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.lock().peers.len()
    }

    /// Close every attached peer's inbound queue.
    pub fn sever(&self) {
        self.lock().peers.clear();
    }

    /// Make subsequent `open` calls fail (or succeed again).
    pub fn set_refusing(&self, refusing: bool) {
        self.lock().refusing = refusing;
    }
}

impl Transport for MemoryHub {
    async fn open(&self) -> Result<Link, TransportError> {
        let (to_peer, inbound) = mpsc::unbounded_channel::<String>();
        let (outbound, mut from_peer) = mpsc::unbounded_channel::<String>();

        let id = {
            let mut state = self.lock();
            if state.refusing {
                return Err(TransportError::Open("hub refused connection".to_string()));
            }
            let id = state.next_peer;
            state.next_peer += 1;
            state.peers.push((id, to_peer));
            id
        };

        let hub = self.clone();
        tokio::spawn(async move {
            while let Some(frame) = from_peer.recv().await {
                let targets: Vec<_> = hub
                    .lock()
                    .peers
                    .iter()
                    .filter(|(peer, _)| *peer != id)
                    .map(|(_, tx)| tx.clone())
                    .collect();
                trace!(from = id, targets = targets.len(), "relaying frame");
                for tx in targets {
                    let _ = tx.send(frame.clone());
                }
            }
            hub.lock().peers.retain(|(peer, _)| *peer != id);
        });

        Ok(Link { outbound, inbound })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_link_pair() {
        let (a, mut b) = Link::pair();
        a.outbound.send("hello".to_string()).unwrap();

        assert_eq!(b.inbound.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_hub_relays_to_others_only() {
        let hub = MemoryHub::new();
        let mut a = hub.open().await.unwrap();
        let mut b = hub.open().await.unwrap();

        a.outbound.send("from a".to_string()).unwrap();
        assert_eq!(b.inbound.recv().await.as_deref(), Some("from a"));
        assert!(a.inbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_hub_refusal_and_sever() {
        let hub = MemoryHub::new();
        hub.set_refusing(true);
        assert!(hub.open().await.is_err());

        hub.set_refusing(false);
        let mut link = hub.open().await.unwrap();
        assert_eq!(hub.peer_count(), 1);

        hub.sever();
        assert_eq!(link.inbound.recv().await, None);
    }
}
