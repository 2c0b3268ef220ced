//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding wire frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// Frame is JSON but not an object carrying a string `status` field.
    #[error("missing message discriminant")]
    MissingDiscriminant,

    /// Discriminant does not name any known server message.
    #[error("unknown message kind: {0:?}")]
    UnknownKind(String),

    /// Discriminant is known but the remaining fields do not match it.
    #[error("malformed {kind} message: {reason}")]
    Malformed {
        /// Kind named by the discriminant
        kind: &'static str,
        /// Deserializer error
        reason: String,
    },

    /// Message decoded but the embedded board violates a structural limit.
    #[error("invalid board state: {0}")]
    InvalidBoard(String),

    /// Message could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
