//! Client and server message enums.
//!
//! # Decoding
//!
//! Server frames are decoded in two steps. The `status` discriminant is read
//! and matched against [`ServerMessageKind`] before any other field is
//! trusted, then the typed variant is deserialized and its board validated.
//! This keeps the error precise (unknown kind vs. malformed known kind) and
//! guarantees that a decoded [`ServerMessage`] is always structurally sound.

use serde::{Deserialize, Serialize};

use crate::{
    BoardState, GameId, GameStatus, PlayerId,
    errors::{ProtocolError, Result},
};

/// Name of the discriminant field in server frames.
const SERVER_TAG: &str = "status";

/// Messages sent from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// First message on every new socket. Carries any known session ids so
    /// the server can resume an in-progress match.
    Connect {
        /// Match the client was part of before the socket dropped.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_id: Option<GameId>,
        /// Identity previously assigned by the server.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_id: Option<PlayerId>,
    },
    /// Create a new match and wait for an opponent.
    CreateGame,
    /// Join an existing match by id.
    JoinGame {
        /// Match to join.
        game_id: GameId,
    },
    /// Submit a guess for the current turn.
    GuessWord {
        /// Uppercase five-letter word.
        word: String,
    },
    /// Start a fresh match with the same opponent.
    NewGame,
    /// Leave the current match.
    DisconnectPlayer,
}

impl ClientMessage {
    /// Serialize to a single-line JSON frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if serialization fails
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Wire name of this message's `action`.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::CreateGame => "createGame",
            Self::JoinGame { .. } => "joinGame",
            Self::GuessWord { .. } => "guessWord",
            Self::NewGame => "newGame",
            Self::DisconnectPlayer => "disconnectPlayer",
        }
    }
}

/// Application error declared by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Machine-readable category (e.g. `notYourTurn`, `invalidJoin`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description.
    pub message: String,
}

/// Messages pushed from the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Identity assignment, sent once per socket.
    Welcome {
        /// Assigned player id.
        player_id: PlayerId,
        /// Greeting text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// A match was created on our behalf.
    Created {
        /// Id of the new match.
        game_id: GameId,
        /// Initial status, normally `waiting`.
        game_status: GameStatus,
    },
    /// We joined (or rejoined) a match.
    Joined {
        /// Id of the joined match.
        game_id: GameId,
        /// Revealed solution, only present once the match is over.
        #[serde(default)]
        solution: Option<String>,
        /// Full board.
        board_state: BoardState,
    },
    /// The board changed within the current match.
    GameUpdate {
        /// Revealed solution, only present once the match is over.
        #[serde(default)]
        solution: Option<String>,
        /// Full board.
        board_state: BoardState,
    },
    /// A new match started in the same session.
    NewGame {
        /// Fresh board.
        board_state: BoardState,
    },
    /// The opponent left.
    Exited {
        /// Board after the opponent left.
        board_state: BoardState,
    },
    /// The server rejected a request.
    Error {
        /// Error details.
        error: ServerError,
    },
}

/// Discriminant of a [`ServerMessage`], usable without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerMessageKind {
    /// `welcome`
    Welcome,
    /// `created`
    Created,
    /// `joined`
    Joined,
    /// `gameUpdate`
    GameUpdate,
    /// `newGame`
    NewGame,
    /// `exited`
    Exited,
    /// `error`
    Error,
}

impl ServerMessageKind {
    /// Parse a wire discriminant. `None` for unknown kinds.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "welcome" => Some(Self::Welcome),
            "created" => Some(Self::Created),
            "joined" => Some(Self::Joined),
            "gameUpdate" => Some(Self::GameUpdate),
            "newGame" => Some(Self::NewGame),
            "exited" => Some(Self::Exited),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Wire discriminant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Created => "created",
            Self::Joined => "joined",
            Self::GameUpdate => "gameUpdate",
            Self::NewGame => "newGame",
            Self::Exited => "exited",
            Self::Error => "error",
        }
    }
}

impl ServerMessage {
    /// Decode and validate a raw text frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Json` if the frame is not JSON
    /// - `ProtocolError::MissingDiscriminant` if there is no string `status`
    /// - `ProtocolError::UnknownKind` if `status` names no known message
    /// - `ProtocolError::Malformed` if the fields do not match the kind
    /// - `ProtocolError::InvalidBoard` if the embedded board breaks a limit
    pub fn decode(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;

        let tag = value
            .get(SERVER_TAG)
            .and_then(serde_json::Value::as_str)
            .ok_or(ProtocolError::MissingDiscriminant)?;
        let kind = ServerMessageKind::from_tag(tag)
            .ok_or_else(|| ProtocolError::UnknownKind(tag.to_owned()))?;

        let message: Self = serde_json::from_value(value)
            .map_err(|e| ProtocolError::Malformed { kind: kind.as_str(), reason: e.to_string() })?;

        if let Some(board) = message.board_state() {
            board.validate()?;
        }

        Ok(message)
    }

    /// Serialize to a single-line JSON frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if serialization fails
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Discriminant of this message.
    pub fn kind(&self) -> ServerMessageKind {
        match self {
            Self::Welcome { .. } => ServerMessageKind::Welcome,
            Self::Created { .. } => ServerMessageKind::Created,
            Self::Joined { .. } => ServerMessageKind::Joined,
            Self::GameUpdate { .. } => ServerMessageKind::GameUpdate,
            Self::NewGame { .. } => ServerMessageKind::NewGame,
            Self::Exited { .. } => ServerMessageKind::Exited,
            Self::Error { .. } => ServerMessageKind::Error,
        }
    }

    /// Embedded board, if this kind carries one.
    pub fn board_state(&self) -> Option<&BoardState> {
        match self {
            Self::Joined { board_state, .. }
            | Self::GameUpdate { board_state, .. }
            | Self::NewGame { board_state }
            | Self::Exited { board_state } => Some(board_state),
            Self::Welcome { .. } | Self::Created { .. } | Self::Error { .. } => None,
        }
    }
}
