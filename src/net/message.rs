//! Wire envelope.
//!
//! Every frame is one JSON object `{"type": <tag>, "payload": <data>}`.
//! The envelope carries no schema beyond the tag; receivers dispatch on
//! `kind` and decode `payload` themselves.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::GameAction;

/// Liveness check with an empty payload.
pub const PING: &str = "PING";
/// A `GameAction` to apply on the receiving peer.
pub const ACTION: &str = "ACTION";
/// Fingerprint of the sender's state after a round.
pub const STATE_DIGEST: &str = "STATE_DIGEST";

/// One message on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl GameMessage {
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Build a message whose payload is `payload` serialized.
    pub fn with_payload<P: Serialize>(
        kind: impl Into<String>,
        payload: &P,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(kind, serde_json::to_value(payload)?))
    }

    #[must_use]
    pub fn ping() -> Self {
        Self::new(PING, Value::Object(Default::default()))
    }

    pub fn action(action: &GameAction) -> Result<Self, serde_json::Error> {
        Self::with_payload(ACTION, action)
    }

    #[must_use]
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Decode the payload into a concrete type.
    pub fn decode<P: DeserializeOwned>(&self) -> Result<P, serde_json::Error> {
        P::deserialize(&self.payload)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}
