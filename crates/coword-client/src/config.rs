//! Client configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:5905/ws";

/// Reconnect attempts after an unexpected close before giving up.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 2;

/// Fixed delay between reconnect attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// How long a notification stays visible before it is dismissed.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Connection and retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// WebSocket endpoint address.
    pub endpoint: String,
    /// Maximum reconnect attempts after an unexpected close.
    pub max_reconnect_attempts: u32,
    /// Fixed delay before each reconnect attempt.
    pub retry_interval: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Connection and retry policy.
    pub connection: ConnectionConfig,
    /// Lifetime of each notification.
    pub notification_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { connection: ConnectionConfig::default(), notification_ttl: DEFAULT_NOTIFICATION_TTL }
    }
}

impl ClientConfig {
    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// - `ConfigError::EmptyEndpoint` if the endpoint is blank
    /// - `ConfigError::UnsupportedScheme` if the endpoint is not `ws://` or
    ///   `wss://`
    /// - `ConfigError::ZeroDuration` if the retry interval or notification
    ///   ttl is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.connection.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(ConfigError::UnsupportedScheme(endpoint.to_string()));
        }
        if self.connection.retry_interval.is_zero() {
            return Err(ConfigError::ZeroDuration { field: "retry_interval" });
        }
        if self.notification_ttl.is_zero() {
            return Err(ConfigError::ZeroDuration { field: "notification_ttl" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ClientConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.connection.endpoint = "  ".into();
        assert_eq!(config.validate(), Err(ConfigError::EmptyEndpoint));

        config.connection.endpoint = "http://localhost".into();
        assert!(matches!(config.validate(), Err(ConfigError::UnsupportedScheme(_))));

        config.connection.endpoint = DEFAULT_ENDPOINT.into();
        config.connection.retry_interval = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDuration { field: "retry_interval" }));
    }
}
