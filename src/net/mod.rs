//! Networking: the wire envelope, a transport seam, the reconnecting
//! channel, and peer synchronization on top of it.
//!
//! Nothing here touches game state directly. Remote actions reach the
//! state only through `GameStore::dispatch_remote`.

mod channel;
mod config;
mod error;
mod message;
mod sync;
mod transport;

pub use channel::{ChannelStatus, Delivery, HandlerError, ReconnectingChannel, Subscription};
pub use config::ChannelConfig;
pub use error::{ChannelError, SyncError, TransportError};
pub use message::{GameMessage, ACTION, PING, STATE_DIGEST};
pub use sync::{SharedStore, StateDigest, SyncSession};
pub use transport::{Link, MemoryHub, Transport};
