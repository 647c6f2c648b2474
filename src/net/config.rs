//! Channel configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reconnection policy.
///
/// Attempt `n` (1-based) waits `base_delay_ms * n` before opening.
/// After `max_attempts` failed attempts the channel stops retrying until
/// `connect` is called again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub base_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            max_attempts: 5,
        }
    }
}

impl ChannelConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Delay before reconnection attempt `attempt` (linear backoff).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(attempt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChannelConfig::default();
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn test_linear_backoff() {
        let config = ChannelConfig::new().with_base_delay(Duration::from_millis(250));

        assert_eq!(config.delay_for(1), Duration::from_millis(250));
        assert_eq!(config.delay_for(4), Duration::from_millis(1000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ChannelConfig = serde_json::from_str(r#"{"max_attempts": 2}"#).unwrap();

        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.base_delay_ms, 1000);
    }
}
