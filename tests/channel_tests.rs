//! Reconnecting channel integration tests.
//!
//! All tests run on a paused tokio clock, so backoff timers advance
//! virtually. `FakeTransport` counts opens, can refuse them, and keeps
//! the remote end of every link it hands out.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use elemental_clash::core::GameAction;
use elemental_clash::net::{
    ChannelConfig, ChannelError, ChannelStatus, Delivery, GameMessage, Link, ReconnectingChannel,
    Transport, TransportError, ACTION,
};

#[derive(Clone, Default)]
struct FakeTransport {
    opens: Arc<AtomicUsize>,
    refusing: Arc<AtomicBool>,
    peers: Arc<Mutex<Vec<Link>>>,
}

impl FakeTransport {
    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn refuse(&self, refusing: bool) {
        self.refusing.store(refusing, Ordering::SeqCst);
    }

    /// Send a raw frame from the remote end of the latest link.
    fn push(&self, frame: &str) {
        let peers = self.peers.lock().unwrap();
        peers.last().unwrap().outbound.send(frame.to_string()).unwrap();
    }

    /// Next frame the channel sent on the latest link, if any.
    fn take_sent(&self) -> Option<String> {
        let mut peers = self.peers.lock().unwrap();
        peers.last_mut().unwrap().inbound.try_recv().ok()
    }

    /// Drop every remote end, closing the links from the far side.
    fn drop_peers(&self) {
        self.peers.lock().unwrap().clear();
    }
}

impl Transport for FakeTransport {
    async fn open(&self) -> Result<Link, TransportError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.refusing.load(Ordering::SeqCst) {
            return Err(TransportError::Open("refused".to_string()));
        }
        let (local, remote) = Link::pair();
        self.peers.lock().unwrap().push(remote);
        Ok(local)
    }
}

fn channel() -> (FakeTransport, ReconnectingChannel<FakeTransport>) {
    let transport = FakeTransport::default();
    let channel = ReconnectingChannel::new(transport.clone(), ChannelConfig::default());
    (transport, channel)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

fn collector(
    channel: &ReconnectingChannel<FakeTransport>,
) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    channel.subscribe(move |message| {
        sink.lock().unwrap().push(message.kind.clone());
        Ok(())
    });
    seen
}

// =============================================================================
// Reconnection Tests
// =============================================================================

/// Test that five failed automatic attempts are the limit, and that an
/// explicit connect afterwards starts over.
#[tokio::test(start_paused = true)]
async fn test_reconnection_bound() {
    let (transport, channel) = channel();
    transport.refuse(true);

    assert!(channel.connect().await.is_err());
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(transport.opens(), 6);
    assert_eq!(channel.attempts(), 5);
    assert_eq!(channel.status(), ChannelStatus::Disconnected);

    transport.refuse(false);
    channel.connect().await.unwrap();

    assert_eq!(transport.opens(), 7);
    assert_eq!(channel.attempts(), 0);
    assert_eq!(channel.status(), ChannelStatus::Open);
}

/// Test that the open error is reported to the caller.
#[tokio::test(start_paused = true)]
async fn test_connect_reports_open_error() {
    let (transport, channel) = channel();
    transport.refuse(true);

    let err = channel.connect().await.unwrap_err();
    assert!(matches!(err, ChannelError::Transport(TransportError::Open(_))));
}

/// Test that disconnect cancels a pending reconnection timer.
#[tokio::test(start_paused = true)]
async fn test_disconnect_cancels_pending_reconnect() {
    let (transport, channel) = channel();
    transport.refuse(true);

    assert!(channel.connect().await.is_err());
    channel.disconnect();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(transport.opens(), 1);
    assert_eq!(channel.status(), ChannelStatus::Disconnected);
}

/// Test that a close from the far side triggers a reconnection.
#[tokio::test(start_paused = true)]
async fn test_unexpected_close_reconnects() {
    let (transport, channel) = channel();
    channel.connect().await.unwrap();

    transport.drop_peers();
    settle().await;
    assert_eq!(channel.status(), ChannelStatus::Reconnecting);
    assert_eq!(channel.attempts(), 1);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(transport.opens(), 2);
    assert_eq!(channel.status(), ChannelStatus::Open);
    assert_eq!(channel.attempts(), 0);
}

/// Test that an intentional close is never followed by a reconnection.
#[tokio::test(start_paused = true)]
async fn test_intentional_close_stays_closed() {
    let (transport, channel) = channel();
    channel.connect().await.unwrap();

    channel.disconnect();
    transport.drop_peers();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(transport.opens(), 1);
    assert_eq!(channel.status(), ChannelStatus::Disconnected);
}

/// Test a custom backoff configuration.
#[tokio::test(start_paused = true)]
async fn test_custom_config() {
    let transport = FakeTransport::default();
    let config = ChannelConfig::new()
        .with_base_delay(Duration::from_millis(100))
        .with_max_attempts(2);
    let channel = ReconnectingChannel::new(transport.clone(), config);
    transport.refuse(true);

    assert!(channel.connect().await.is_err());
    tokio::time::sleep(Duration::from_millis(350)).await;

    assert_eq!(transport.opens(), 3);
    assert_eq!(channel.status(), ChannelStatus::Disconnected);
}

// =============================================================================
// Delivery Tests
// =============================================================================

/// Test that handlers see messages in arrival order.
#[tokio::test(start_paused = true)]
async fn test_delivery_in_order() {
    let (transport, channel) = channel();
    let seen = collector(&channel);
    channel.connect().await.unwrap();

    for kind in ["FIRST", "SECOND", "THIRD"] {
        transport.push(&format!(r#"{{"type":"{kind}","payload":null}}"#));
    }
    settle().await;

    assert_eq!(*seen.lock().unwrap(), vec!["FIRST", "SECOND", "THIRD"]);
}

/// Test that a failing handler does not stop delivery to the others.
#[tokio::test(start_paused = true)]
async fn test_failing_handler_isolated() {
    let (transport, channel) = channel();
    channel.subscribe(|_| Err("boom".into()));
    let seen = collector(&channel);
    channel.connect().await.unwrap();

    transport.push(r#"{"type":"PING","payload":{}}"#);
    settle().await;

    assert_eq!(*seen.lock().unwrap(), vec!["PING"]);
}

/// Test that a panicking handler neither starves the others nor stops
/// later deliveries.
#[tokio::test(start_paused = true)]
async fn test_panicking_handler_isolated() {
    let (transport, channel) = channel();
    channel.subscribe(|message| {
        if message.is("BOOM") {
            panic!("handler blew up");
        }
        Ok(())
    });
    let seen = collector(&channel);
    channel.connect().await.unwrap();

    transport.push(r#"{"type":"BOOM","payload":null}"#);
    transport.push(r#"{"type":"PING","payload":{}}"#);
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(*seen.lock().unwrap(), vec!["BOOM", "PING"]);
    assert!(channel.is_open());
    assert_eq!(transport.opens(), 1);
}

/// Test that malformed frames are dropped and the channel stays open.
#[tokio::test(start_paused = true)]
async fn test_malformed_frame_dropped() {
    let (transport, channel) = channel();
    let seen = collector(&channel);
    channel.connect().await.unwrap();

    transport.push("{not json");
    transport.push(r#"{"payload":{}}"#);
    transport.push(r#"{"type":"ACTION","payload":{"type":"START_BATTLE"}}"#);
    settle().await;

    assert_eq!(*seen.lock().unwrap(), vec![ACTION]);
    assert!(channel.is_open());
}

/// Test that unsubscribed handlers stop receiving.
#[tokio::test(start_paused = true)]
async fn test_unsubscribe_stops_delivery() {
    let (transport, channel) = channel();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let subscription = channel.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    channel.connect().await.unwrap();

    transport.push(r#"{"type":"PING"}"#);
    settle().await;
    assert!(channel.unsubscribe(subscription));
    transport.push(r#"{"type":"PING"}"#);
    settle().await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// Test that sends reach the transport as JSON text frames.
#[tokio::test(start_paused = true)]
async fn test_send_writes_frames() {
    let (transport, channel) = channel();
    channel.connect().await.unwrap();

    let message = GameMessage::action(&GameAction::StartBattle).unwrap();
    assert_eq!(channel.send(&message).unwrap(), Delivery::Sent);
    assert_eq!(channel.ping().unwrap(), Delivery::Sent);

    assert_eq!(
        transport.take_sent().as_deref(),
        Some(r#"{"type":"ACTION","payload":{"type":"START_BATTLE"}}"#)
    );
    assert_eq!(
        transport.take_sent().as_deref(),
        Some(r#"{"type":"PING","payload":{}}"#)
    );
}

/// Test that sends while not open are dropped, not queued.
#[tokio::test(start_paused = true)]
async fn test_send_while_closed_dropped() {
    let (transport, channel) = channel();
    channel.connect().await.unwrap();
    channel.disconnect();

    assert_eq!(channel.ping().unwrap(), Delivery::Dropped);

    channel.connect().await.unwrap();
    assert_eq!(transport.take_sent(), None);
}

/// Transport whose opens take a while to complete.
#[derive(Clone, Default)]
struct SlowTransport {
    opens: Arc<AtomicUsize>,
    peers: Arc<Mutex<Vec<Link>>>,
}

impl Transport for SlowTransport {
    async fn open(&self) -> Result<Link, TransportError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        let (local, remote) = Link::pair();
        self.peers.lock().unwrap().push(remote);
        Ok(local)
    }
}

/// Test that a connect issued while another is in flight supersedes it.
#[tokio::test(start_paused = true)]
async fn test_overlapping_connect_supersedes_first() {
    let transport = SlowTransport::default();
    let channel = ReconnectingChannel::new(transport.clone(), ChannelConfig::default());

    let (first, second) = tokio::join!(channel.connect(), channel.connect());

    assert!(matches!(first, Err(ChannelError::Closed)));
    assert!(second.is_ok());
    assert_eq!(channel.status(), ChannelStatus::Open);
    assert_eq!(transport.opens.load(Ordering::SeqCst), 2);
}
