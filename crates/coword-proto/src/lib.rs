//! Wire protocol for CoWord.
//!
//! Every frame exchanged with the server is a single newline-free JSON object.
//! Client messages carry their kind in an `action` field, server messages in a
//! `status` field. Both directions are modelled as tagged enums so that an
//! ill-shaped frame is rejected at the boundary instead of leaking into game
//! state.
//!
//! # Components
//!
//! - [`ClientMessage`]: intents the client sends
//! - [`ServerMessage`]: events the server pushes, decoded with
//!   [`ServerMessage::decode`]
//! - [`BoardState`]: authoritative board snapshot embedded in most events
//! - [`ProtocolError`]: everything that can go wrong at the boundary

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod board;
pub mod errors;
mod ids;
mod message;

pub use board::{BoardState, GameStatus, Guess, KeyboardStatus, LetterColor};
pub use errors::{ProtocolError, Result};
pub use ids::{GameId, PlayerId};
pub use message::{ClientMessage, ServerError, ServerMessage, ServerMessageKind};

/// Number of letters in every word.
pub const WORD_LENGTH: usize = 5;

/// Maximum number of guesses in a single match.
pub const MAX_GUESSES: usize = 6;

/// Maximum number of players in a single match.
pub const MAX_PLAYERS: usize = 2;
