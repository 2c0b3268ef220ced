//! Client error types.
//!
//! None of these are fatal to a running client: protocol and connection
//! errors degrade to a log line or a notification. Only configuration errors
//! are returned to the caller, at construction time.

use coword_proto::ProtocolError;
use thiserror::Error;

use crate::connection::ConnectionState;

/// Invalid client configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Endpoint is blank.
    #[error("endpoint must not be empty")]
    EmptyEndpoint,

    /// Endpoint is not a WebSocket URL.
    #[error("endpoint {0:?} must use ws:// or wss://")]
    UnsupportedScheme(String),

    /// A duration that must be positive is zero.
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Offending field
        field: &'static str,
    },
}

/// Errors from the connection state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Message dropped because there is no open socket.
    #[error("not connected (state {state:?})")]
    NotConnected {
        /// State when the send was attempted
        state: ConnectionState,
    },

    /// Message could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Top-level client errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Configuration rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
