//! Board snapshot carried by server events.
//!
//! The server owns the board; the client only ever replaces its copy
//! wholesale. [`BoardState::validate`] enforces the structural limits so that a
//! decoded board is always safe to store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    MAX_GUESSES, MAX_PLAYERS, PlayerId, WORD_LENGTH,
    errors::{ProtocolError, Result},
};

/// Per-letter feedback color.
///
/// Variants are declared in rank order, so `Ord` gives
/// `Gray < Yellow < Green`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterColor {
    /// Letter is not in the solution.
    Gray,
    /// Letter is in the solution at another position.
    Yellow,
    /// Letter is at this position in the solution.
    Green,
}

/// Match lifecycle as declared by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    /// No match yet.
    #[default]
    Pending,
    /// Match created, waiting for the second player.
    Waiting,
    /// Both players present, guesses accepted.
    InProgress,
    /// Solution found.
    Won,
    /// Guesses exhausted.
    Lost,
}

impl GameStatus {
    /// Whether the match has ended.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Best color learned so far for each letter.
pub type KeyboardStatus = BTreeMap<char, LetterColor>;

/// One submitted word with its feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    /// The guessed word.
    pub word: String,
    /// Feedback color for each letter of `word`, in order.
    pub status: [LetterColor; WORD_LENGTH],
}

/// Authoritative board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    /// Player allowed to guess next.
    pub current_turn: PlayerId,
    /// Guesses so far, oldest first.
    pub guesses: Vec<Guess>,
    /// Match lifecycle.
    pub game_status: GameStatus,
    /// Best color per letter.
    #[serde(default)]
    pub keyboard_status: KeyboardStatus,
    /// Players in the match, in server order.
    pub players: Vec<PlayerId>,
}

impl BoardState {
    /// Check structural limits.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidBoard` if there are more than [`MAX_GUESSES`]
    ///   guesses or [`MAX_PLAYERS`] players, a guessed word is not
    ///   [`WORD_LENGTH`] ASCII letters, or a keyboard key is not a letter.
    pub fn validate(&self) -> Result<()> {
        if self.guesses.len() > MAX_GUESSES {
            return Err(ProtocolError::InvalidBoard(format!(
                "{} guesses exceeds limit of {MAX_GUESSES}",
                self.guesses.len()
            )));
        }

        if self.players.len() > MAX_PLAYERS {
            return Err(ProtocolError::InvalidBoard(format!(
                "{} players exceeds limit of {MAX_PLAYERS}",
                self.players.len()
            )));
        }

        for guess in &self.guesses {
            let letters = guess.word.chars().count();
            if letters != WORD_LENGTH || !guess.word.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ProtocolError::InvalidBoard(format!(
                    "guess {:?} is not a {WORD_LENGTH}-letter word",
                    guess.word
                )));
            }
        }

        if let Some(key) = self.keyboard_status.keys().find(|k| !k.is_ascii_alphabetic()) {
            return Err(ProtocolError::InvalidBoard(format!("keyboard key {key:?} is not a letter")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardState {
        BoardState {
            current_turn: PlayerId::new("P1"),
            guesses: vec![Guess { word: "CRANE".into(), status: [LetterColor::Gray; WORD_LENGTH] }],
            game_status: GameStatus::InProgress,
            keyboard_status: KeyboardStatus::from([('C', LetterColor::Gray)]),
            players: vec![PlayerId::new("P1"), PlayerId::new("P2")],
        }
    }

    #[test]
    fn color_rank_order() {
        assert!(LetterColor::Gray < LetterColor::Yellow);
        assert!(LetterColor::Yellow < LetterColor::Green);
    }

    #[test]
    fn valid_board_passes() {
        assert_eq!(board().validate(), Ok(()));
    }

    #[test]
    fn too_many_guesses_rejected() {
        let mut board = board();
        let guess = board.guesses[0].clone();
        board.guesses = vec![guess; MAX_GUESSES + 1];
        assert!(matches!(board.validate(), Err(ProtocolError::InvalidBoard(_))));
    }

    #[test]
    fn short_word_rejected() {
        let mut board = board();
        board.guesses[0].word = "CRAN".into();
        assert!(matches!(board.validate(), Err(ProtocolError::InvalidBoard(_))));
    }

    #[test]
    fn third_player_rejected() {
        let mut board = board();
        board.players.push(PlayerId::new("P3"));
        assert!(matches!(board.validate(), Err(ProtocolError::InvalidBoard(_))));
    }

    #[test]
    fn non_letter_key_rejected() {
        let mut board = board();
        board.keyboard_status.insert('7', LetterColor::Green);
        assert!(matches!(board.validate(), Err(ProtocolError::InvalidBoard(_))));
    }
}
