//! Error types for the networking layer.

use thiserror::Error;

/// Failure reported by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport failed to open: {0}")]
    Open(String),

    #[error("transport closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The channel was disconnected or reconnected while opening.
    #[error("channel closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to digest state: {0}")]
    Digest(#[from] bincode::Error),
}
