//! Command-line arguments.

use std::time::Duration;

use clap::Parser;
use coword_client::{
    ClientConfig, ConnectionConfig,
    config::{
        DEFAULT_ENDPOINT, DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_NOTIFICATION_TTL,
        DEFAULT_RETRY_INTERVAL,
    },
};

/// CoWord terminal client
///
/// Type a word and press Enter to guess. Commands: /create, /join <ID>, /new,
/// /leave, /connect, /disconnect, /back, /dismiss <n>, /quit.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "coword")]
#[command(about = "Terminal client for the CoWord two-player word game")]
#[command(version)]
pub struct Args {
    /// WebSocket endpoint of the game server
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Reconnect attempts after an unexpected disconnect
    #[arg(long, default_value_t = DEFAULT_MAX_RECONNECT_ATTEMPTS)]
    pub max_reconnect_attempts: u32,

    /// Delay before each reconnect attempt, in milliseconds
    #[arg(long, default_value_t = DEFAULT_RETRY_INTERVAL.as_millis() as u64)]
    pub retry_interval_ms: u64,

    /// How long notifications stay visible, in milliseconds
    #[arg(long, default_value_t = DEFAULT_NOTIFICATION_TTL.as_millis() as u64)]
    pub notification_ttl_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Client configuration described by these arguments.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            connection: ConnectionConfig {
                endpoint: self.endpoint.clone(),
                max_reconnect_attempts: self.max_reconnect_attempts,
                retry_interval: Duration::from_millis(self.retry_interval_ms),
            },
            notification_ttl: Duration::from_millis(self.notification_ttl_ms),
        }
    }
}
