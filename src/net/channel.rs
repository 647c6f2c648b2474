//! Reconnecting message channel.
//!
//! `ReconnectingChannel` wraps a `Transport` and exposes `connect`,
//! `send`, `subscribe`/`unsubscribe`, `ping` and `disconnect`.
//!
//! ## Reconnection
//!
//! An open failure or an unexpected close schedules attempt `n` after
//! `base_delay * n`. A successful open resets the counter. Once
//! `max_attempts` attempts have failed the channel reports
//! `ChannelStatus::Disconnected` and stays there until `connect` is
//! called again.
//!
//! `disconnect` is an intentional close: it aborts any pending
//! reconnection timer and the reader, and no automatic attempt fires
//! afterwards.
//!
//! ## Delivery
//!
//! Inbound frames are decoded and handed to every subscriber in arrival
//! order. Malformed frames and failing or panicking handlers are logged
//! and skipped.
//! Sends while not open are dropped with a warning, never queued.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::ChannelConfig;
use super::error::ChannelError;
use super::message::GameMessage;
use super::transport::{Link, Transport};

/// Error a subscriber may return.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler = Arc<dyn Fn(&GameMessage) -> Result<(), HandlerError> + Send + Sync>;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Connection status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Never connected.
    Idle,
    Connecting,
    Open,
    /// Waiting for or running an automatic attempt.
    Reconnecting,
    /// Closed intentionally, or gave up reconnecting.
    Disconnected,
}

/// What happened to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// The channel was not open; the message is lost.
    Dropped,
}

/// Token returned by `subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct ChannelState {
    status: ChannelStatus,
    outbound: Option<mpsc::UnboundedSender<String>>,
    attempts: u32,
    intentional_close: bool,
    /// Bumped by `connect` and `disconnect`; tasks from older generations
    /// leave the state alone.
    generation: u64,
    reconnect_task: Option<JoinHandle<()>>,
    reader_task: Option<JoinHandle<()>>,
}

struct Inner<T> {
    transport: T,
    config: ChannelConfig,
    state: Mutex<ChannelState>,
    handlers: Mutex<Vec<(Subscription, Handler)>>,
    next_subscription: AtomicU64,
}

/// Transport-agnostic duplex channel with bounded automatic reconnection.
///
/// Cloning yields another handle to the same channel.
pub struct ReconnectingChannel<T: Transport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Clone for ReconnectingChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> ReconnectingChannel<T> {
    #[must_use]
    pub fn new(transport: T, config: ChannelConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                config,
                state: Mutex::new(ChannelState {
                    status: ChannelStatus::Idle,
                    outbound: None,
                    attempts: 0,
                    intentional_close: false,
                    generation: 0,
                    reconnect_task: None,
                    reader_task: None,
                }),
                handlers: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> ChannelConfig {
        self.inner.config
    }

    #[must_use]
    pub fn status(&self) -> ChannelStatus {
        self.inner.lock().status
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status() == ChannelStatus::Open
    }

    /// Automatic attempts made since the last successful open or explicit
    /// `connect`.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.inner.lock().attempts
    }

    /// Open the transport.
    ///
    /// Clears a previous intentional close, cancels any pending automatic
    /// attempt and starts a fresh attempt budget. Fails if the transport
    /// fails to open, in which case automatic reconnection is scheduled.
    ///
    /// A `connect` issued while another is still opening supersedes it:
    /// the earlier call returns `ChannelError::Closed` and only the later
    /// link is kept.
    pub async fn connect(&self) -> Result<(), ChannelError> {
        let generation = {
            let mut state = self.inner.lock();
            if state.status == ChannelStatus::Open {
                return Ok(());
            }
            state.intentional_close = false;
            state.attempts = 0;
            if let Some(task) = state.reconnect_task.take() {
                task.abort();
            }
            state.generation += 1;
            state.status = ChannelStatus::Connecting;
            state.generation
        };
        Inner::establish(Arc::clone(&self.inner), generation).await
    }

    /// Intentionally close. Suppresses all automatic reconnection.
    pub fn disconnect(&self) {
        let mut state = self.inner.lock();
        state.intentional_close = true;
        state.generation += 1;
        if let Some(task) = state.reconnect_task.take() {
            task.abort();
        }
        if let Some(task) = state.reader_task.take() {
            task.abort();
        }
        state.outbound = None;
        state.status = ChannelStatus::Disconnected;
        info!("channel disconnected");
    }

    /// Send a message if the channel is open.
    ///
    /// Fails only if the message cannot be encoded.
    pub fn send(&self, message: &GameMessage) -> Result<Delivery, ChannelError> {
        let frame = message.to_json()?;
        let state = self.inner.lock();
        let delivered = match (&state.outbound, state.status) {
            (Some(tx), ChannelStatus::Open) => tx.send(frame).is_ok(),
            _ => false,
        };
        if delivered {
            Ok(Delivery::Sent)
        } else {
            warn!(kind = %message.kind, status = ?state.status, "send dropped, channel not open");
            Ok(Delivery::Dropped)
        }
    }

    /// Liveness check. A plain send; no reply is tracked.
    pub fn ping(&self) -> Result<Delivery, ChannelError> {
        self.send(&GameMessage::ping())
    }

    /// Register a handler for every inbound message.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&GameMessage) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let id = Subscription(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner.handlers().push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns whether it was registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut handlers = self.inner.handlers();
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription);
        handlers.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers().len()
    }
}

impl<T: Transport> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers(&self) -> MutexGuard<'_, Vec<(Subscription, Handler)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the transport for `generation` and wire up the reader.
    fn establish(inner: Arc<Self>, generation: u64) -> BoxFuture<Result<(), ChannelError>> {
        Box::pin(async move {
            let opened = inner.transport.open().await;
            let mut state = inner.lock();
            if state.generation != generation || state.intentional_close {
                debug!(generation, "stale open discarded");
                return Err(ChannelError::Closed);
            }

            match opened {
                Ok(Link { outbound, inbound }) => {
                    state.outbound = Some(outbound);
                    state.status = ChannelStatus::Open;
                    state.attempts = 0;
                    state.reconnect_task = None;
                    if let Some(task) = state.reader_task.take() {
                        task.abort();
                    }
                    state.reader_task = Some(tokio::spawn(Self::read_loop(
                        Arc::clone(&inner),
                        inbound,
                        generation,
                    )));
                    info!("channel open");
                    Ok(())
                }
                Err(err) => {
                    warn!(%err, attempt = state.attempts, "channel open failed");
                    state.outbound = None;
                    Self::schedule_reconnect(&inner, &mut state);
                    Err(err.into())
                }
            }
        })
    }

    fn schedule_reconnect(inner: &Arc<Self>, state: &mut ChannelState) {
        if state.intentional_close {
            state.status = ChannelStatus::Disconnected;
            return;
        }
        if state.attempts >= inner.config.max_attempts {
            state.status = ChannelStatus::Disconnected;
            state.reconnect_task = None;
            warn!(attempts = state.attempts, "reconnection attempts exhausted");
            return;
        }

        state.attempts += 1;
        state.status = ChannelStatus::Reconnecting;
        let delay = inner.config.delay_for(state.attempts);
        let generation = state.generation;
        debug!(attempt = state.attempts, ?delay, "reconnect scheduled");

        let inner = Arc::clone(inner);
        state.reconnect_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = Self::establish(inner, generation).await;
        }));
    }

    async fn read_loop(
        inner: Arc<Self>,
        mut inbound: mpsc::UnboundedReceiver<String>,
        generation: u64,
    ) {
        while let Some(frame) = inbound.recv().await {
            inner.deliver(&frame);
        }

        let mut state = inner.lock();
        if state.generation != generation || state.intentional_close {
            return;
        }
        info!("channel closed by transport");
        state.outbound = None;
        state.reader_task = None;
        Self::schedule_reconnect(&inner, &mut state);
    }

    fn deliver(&self, frame: &str) {
        let message = match GameMessage::from_json(frame) {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, "malformed frame dropped");
                return;
            }
        };

        // Snapshot so handlers may subscribe or unsubscribe.
        let handlers: Vec<Handler> = self.handlers().iter().map(|(_, h)| Arc::clone(h)).collect();
        for handler in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(&message))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(kind = %message.kind, %err, "message handler failed"),
                Err(_) => warn!(kind = %message.kind, "message handler panicked"),
            }
        }
    }
}
