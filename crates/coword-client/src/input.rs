//! Guess typing and submission.
//!
//! The controller owns the unsent buffer. Whether input is accepted is decided
//! by one rule, [`Gate::evaluate`]: the match is in progress, both players are
//! present, and the turn is ours.
//!
//! The buffer is cleared by a store listener whenever the number of guesses
//! grows, and whenever the match itself is replaced or torn down. In an
//! alternating-turn match only the active typist can have a non-empty buffer
//! at that point, so the reset is unconditional.

use std::{cell::RefCell, rc::Rc};

use coword_proto::{ClientMessage, GameStatus, MAX_PLAYERS, ServerMessageKind, WORD_LENGTH};

use crate::{
    connection::{ConnectionAction, ConnectionManager},
    notification::{NotificationPayload, NotificationQueue},
    store::{ChangeCause, GameStateStore, ListenerId, MatchState, Session, StoreChange},
};

/// Shown when submitting out of turn.
pub const NOT_YOUR_TURN_MESSAGE: &str = "It's not your turn";

/// Shown when submitting a short word.
pub const NOT_ENOUGH_LETTERS_MESSAGE: &str = "Not enough letters";

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Backspace key (delete last letter).
    Backspace,
    /// Enter/Return key (submit).
    Enter,
}

/// Outcome of the input gating rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Input accepted.
    Open,
    /// No match, or the match is not in progress.
    NotInProgress,
    /// Fewer than two players present.
    WaitingForOpponent,
    /// Another player holds the turn.
    NotYourTurn,
}

impl Gate {
    /// Evaluate the gating rule against the current state.
    pub fn evaluate(session: &Session, game: Option<&MatchState>) -> Self {
        let Some(game) = game.filter(|g| g.game_status == GameStatus::InProgress) else {
            return Self::NotInProgress;
        };
        if game.players.len() != MAX_PLAYERS {
            return Self::WaitingForOpponent;
        }
        match &session.player_id {
            Some(me) if game.is_turn_of(me) => Self::Open,
            _ => Self::NotYourTurn,
        }
    }

    /// Whether input is accepted.
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// Letters typed but not yet accepted by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInput {
    buffer: String,
    /// Guess count at the last store change.
    observed_guesses: usize,
}

impl PendingInput {
    /// Typed letters, uppercase.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    fn observe(&mut self, change: &StoreChange<'_>) {
        let guesses = change.guess_count();
        let new_match = matches!(
            change.cause,
            ChangeCause::Teardown
                | ChangeCause::Server(
                    ServerMessageKind::Created
                        | ServerMessageKind::Joined
                        | ServerMessageKind::NewGame
                        | ServerMessageKind::Exited
                )
        );

        if (new_match || guesses > self.observed_guesses) && !self.buffer.is_empty() {
            tracing::debug!(guesses, cause = ?change.cause, "clearing input");
            self.buffer.clear();
        }
        self.observed_guesses = guesses;
    }
}

/// Buffers letters and turns them into `guessWord` messages.
#[derive(Debug)]
pub struct GuessInputController {
    pending: Rc<RefCell<PendingInput>>,
    listener: ListenerId,
}

impl GuessInputController {
    /// Create a controller and register its reset listener on `store`.
    pub fn attach(store: &mut GameStateStore) -> Self {
        let pending = Rc::new(RefCell::new(PendingInput {
            buffer: String::new(),
            observed_guesses: store.game().map_or(0, |g| g.guesses.len()),
        }));

        let sink = Rc::clone(&pending);
        let listener = store.subscribe(move |change| sink.borrow_mut().observe(change));

        Self { pending, listener }
    }

    /// Remove the reset listener from `store`.
    pub fn detach(self, store: &mut GameStateStore) {
        store.unsubscribe(self.listener);
    }

    /// Typed letters, uppercase.
    pub fn buffer(&self) -> String {
        self.pending.borrow().buffer.clone()
    }

    /// Copy of the pending input.
    pub fn pending(&self) -> PendingInput {
        self.pending.borrow().clone()
    }

    /// Append a letter. Returns `true` if the buffer changed.
    pub fn add_letter(&self, ch: char, store: &GameStateStore) -> bool {
        if !ch.is_ascii_alphabetic() || !self.gate(store).is_open() {
            return false;
        }

        let mut pending = self.pending.borrow_mut();
        if pending.buffer.len() >= WORD_LENGTH {
            return false;
        }
        pending.buffer.push(ch.to_ascii_uppercase());
        true
    }

    /// Drop the last letter. Returns `true` if the buffer changed.
    pub fn remove_letter(&self, store: &GameStateStore) -> bool {
        if !self.gate(store).is_open() {
            return false;
        }
        self.pending.borrow_mut().buffer.pop().is_some()
    }

    /// Send the buffered word as a guess.
    ///
    /// Nothing is sent unless the gate is open and the buffer holds a full
    /// word. Out-of-turn and short submissions raise a notification instead.
    /// The buffer is kept until the server reports the guess.
    pub fn submit(
        &self,
        store: &GameStateStore,
        connection: &mut ConnectionManager,
        notifications: &mut NotificationQueue,
    ) -> Vec<ConnectionAction> {
        match self.gate(store) {
            Gate::Open => {},
            Gate::NotYourTurn => {
                notifications.enqueue(NotificationPayload::message(NOT_YOUR_TURN_MESSAGE));
                return vec![];
            },
            gate => {
                tracing::debug!(?gate, "submit ignored");
                return vec![];
            },
        }

        let word = self.buffer();
        if word.len() != WORD_LENGTH {
            notifications.enqueue(NotificationPayload::message(NOT_ENOUGH_LETTERS_MESSAGE));
            return vec![];
        }

        tracing::info!(%word, "submitting guess");
        connection.send(&ClientMessage::GuessWord { word }, notifications)
    }

    /// Dispatch one key press.
    pub fn handle_key(
        &self,
        key: KeyInput,
        store: &GameStateStore,
        connection: &mut ConnectionManager,
        notifications: &mut NotificationQueue,
    ) -> Vec<ConnectionAction> {
        match key {
            KeyInput::Char(ch) => {
                self.add_letter(ch, store);
                vec![]
            },
            KeyInput::Backspace => {
                self.remove_letter(store);
                vec![]
            },
            KeyInput::Enter => self.submit(store, connection, notifications),
        }
    }

    fn gate(&self, store: &GameStateStore) -> Gate {
        Gate::evaluate(store.session(), store.game())
    }
}
