//! Client-side projection of the authoritative match state.
//!
//! [`GameStateStore`] is the only owner of [`Session`] and [`MatchState`].
//! Server events mutate it through [`GameStateStore::apply_server_event`];
//! everything else reads borrowed views or registers a listener.
//!
//! Every mutation replaces whole fields from the event payload, keyboard
//! included. The store
//! never checks whether a guess is correct or a match is won: it mirrors what
//! the server declares.

use std::fmt;

use coword_proto::{
    BoardState, GameId, GameStatus, Guess, KeyboardStatus, PlayerId, ServerMessage,
    ServerMessageKind,
};

use crate::notification::{NotificationPayload, NotificationQueue};

/// Identity of this client and the match it is in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Assigned once by the server in `welcome`.
    pub player_id: Option<PlayerId>,
    /// Set by `created`/`joined`, cleared on teardown.
    pub game_id: Option<GameId>,
}

/// Local copy of the current match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    /// Player allowed to guess next. `None` until the server names one.
    pub current_turn: Option<PlayerId>,
    /// Guesses so far, oldest first.
    pub guesses: Vec<Guess>,
    /// Match lifecycle.
    pub game_status: GameStatus,
    /// Color per letter, as last sent by the server.
    pub keyboard_status: KeyboardStatus,
    /// Players in the match.
    pub players: Vec<PlayerId>,
    /// Revealed solution.
    pub solution: Option<String>,
}

impl MatchState {
    /// Build a match from a server board.
    pub fn from_board(board: BoardState, solution: Option<String>) -> Self {
        Self {
            current_turn: Some(board.current_turn),
            guesses: board.guesses,
            game_status: board.game_status,
            keyboard_status: board.keyboard_status,
            players: board.players,
            solution,
        }
    }

    /// Whether `player` holds the turn.
    pub fn is_turn_of(&self, player: &PlayerId) -> bool {
        self.current_turn.as_ref() == Some(player)
    }
}

/// What caused a store change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// A server event of this kind was applied.
    Server(ServerMessageKind),
    /// The local match was torn down.
    Teardown,
}

/// Read-only view handed to listeners after a mutation.
#[derive(Debug, Clone, Copy)]
pub struct StoreChange<'a> {
    /// What triggered the change.
    pub cause: ChangeCause,
    /// Session after the change.
    pub session: &'a Session,
    /// Match after the change.
    pub game: Option<&'a MatchState>,
}

impl StoreChange<'_> {
    /// Number of guesses in the match after the change.
    pub fn guess_count(&self) -> usize {
        self.game.map_or(0, |g| g.guesses.len())
    }
}

/// Owned copy of the store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Session.
    pub session: Session,
    /// Match, if any.
    pub game: Option<MatchState>,
}

/// Listener registration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreChange<'_>)>;

/// Owner of session and match state.
#[derive(Default)]
pub struct GameStateStore {
    session: Session,
    game: Option<MatchState>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for GameStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStateStore")
            .field("session", &self.session)
            .field("game", &self.game)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GameStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session ids.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current match, if any.
    pub fn game(&self) -> Option<&MatchState> {
        self.game.as_ref()
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot { session: self.session.clone(), game: self.game.clone() }
    }

    /// Register a listener called after every mutation, in registration order.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange<'_>) + 'static) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        before != self.listeners.len()
    }

    /// Apply one decoded server event.
    ///
    /// Returns `true` if state changed and listeners ran. `error` events
    /// change nothing and are forwarded to `notifications` verbatim.
    pub fn apply_server_event(
        &mut self,
        event: ServerMessage,
        notifications: &mut NotificationQueue,
    ) -> bool {
        let kind = event.kind();

        match event {
            ServerMessage::Welcome { player_id, .. } => {
                tracing::info!(%player_id, "player id assigned");
                self.session.player_id = Some(player_id);
            },
            ServerMessage::Created { game_id, game_status } => {
                tracing::info!(%game_id, ?game_status, "match created");
                self.session.game_id = Some(game_id);
                self.game = Some(MatchState { game_status, ..MatchState::default() });
            },
            ServerMessage::Joined { game_id, solution, board_state } => {
                tracing::info!(%game_id, status = ?board_state.game_status, "match joined");
                self.session.game_id = Some(game_id);
                self.game = Some(MatchState::from_board(board_state, solution));
            },
            ServerMessage::GameUpdate { solution, board_state } => {
                let next = MatchState::from_board(board_state, solution);
                if let Some(prev) = &self.game {
                    warn_on_regression(&prev.keyboard_status, &next.keyboard_status);
                }
                tracing::debug!(
                    guesses = next.guesses.len(),
                    status = ?next.game_status,
                    "match updated"
                );
                self.game = Some(next);
            },
            ServerMessage::NewGame { board_state } | ServerMessage::Exited { board_state } => {
                tracing::info!(kind = kind.as_str(), status = ?board_state.game_status, "board reset");
                let mut next = MatchState::from_board(board_state, None);
                next.guesses.clear();
                self.game = Some(next);
            },
            ServerMessage::Error { error } => {
                tracing::info!(kind = %error.kind, message = %error.message, "server error");
                notifications.enqueue(NotificationPayload::ServerError(error));
                return false;
            },
        }

        self.notify(ChangeCause::Server(kind));
        true
    }

    /// Drop the match and its id. The player id is kept.
    pub fn teardown(&mut self) {
        if self.session.game_id.is_none() && self.game.is_none() {
            return;
        }

        tracing::info!(game_id = ?self.session.game_id, "match torn down");
        self.session.game_id = None;
        self.game = None;
        self.notify(ChangeCause::Teardown);
    }

    fn notify(&mut self, cause: ChangeCause) {
        let change = StoreChange { cause, session: &self.session, game: self.game.as_ref() };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

/// Log keys whose color dropped or vanished. The payload is stored as sent.
fn warn_on_regression(prev: &KeyboardStatus, next: &KeyboardStatus) {
    for (&key, &stored) in prev {
        match next.get(&key) {
            Some(&incoming) if incoming < stored => {
                tracing::warn!(%key, ?stored, ?incoming, "keyboard color regressed");
            },
            None => tracing::warn!(%key, ?stored, "keyboard key dropped"),
            Some(_) => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use coword_proto::{LetterColor, ServerError};

    use super::*;

    fn board(turn: &str, words: &[&str], status: GameStatus) -> BoardState {
        BoardState {
            current_turn: PlayerId::new(turn),
            guesses: words
                .iter()
                .map(|w| Guess { word: (*w).to_string(), status: [LetterColor::Gray; 5] })
                .collect(),
            game_status: status,
            keyboard_status: KeyboardStatus::new(),
            players: vec![PlayerId::new("P1"), PlayerId::new("P2")],
        }
    }

    #[test]
    fn welcome_sets_player() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();

        let changed = store.apply_server_event(
            ServerMessage::Welcome { player_id: PlayerId::new("P1"), message: None },
            &mut notes,
        );

        assert!(changed);
        assert_eq!(store.session().player_id, Some(PlayerId::new("P1")));
        assert!(store.game().is_none());
    }

    #[test]
    fn created_sets_game_and_status() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();

        store.apply_server_event(
            ServerMessage::Created { game_id: GameId::new("ABCDE"), game_status: GameStatus::Waiting },
            &mut notes,
        );

        assert_eq!(store.session().game_id, Some(GameId::new("ABCDE")));
        assert_eq!(store.game().map(|g| g.game_status), Some(GameStatus::Waiting));
    }

    #[test]
    fn joined_replaces_everything() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        store.apply_server_event(
            ServerMessage::Joined {
                game_id: GameId::new("OLD"),
                solution: Some("CRANE".into()),
                board_state: board("P2", &["SLATE", "CRANE"], GameStatus::Won),
            },
            &mut notes,
        );

        let fresh = board("P1", &[], GameStatus::InProgress);
        store.apply_server_event(
            ServerMessage::Joined {
                game_id: GameId::new("NEW"),
                solution: None,
                board_state: fresh.clone(),
            },
            &mut notes,
        );

        assert_eq!(store.session().game_id, Some(GameId::new("NEW")));
        assert_eq!(store.game(), Some(&MatchState::from_board(fresh, None)));
    }

    #[test]
    fn new_game_clears_guesses_and_solution_keeps_id() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        store.apply_server_event(
            ServerMessage::Joined {
                game_id: GameId::new("ABCDE"),
                solution: Some("CRANE".into()),
                board_state: board("P1", &["CRANE"], GameStatus::Won),
            },
            &mut notes,
        );

        store.apply_server_event(
            ServerMessage::NewGame { board_state: board("P2", &["STALE"], GameStatus::InProgress) },
            &mut notes,
        );

        let game = store.game().cloned().unwrap_or_default();
        assert!(game.guesses.is_empty());
        assert_eq!(game.solution, None);
        assert_eq!(game.current_turn, Some(PlayerId::new("P2")));
        assert_eq!(store.session().game_id, Some(GameId::new("ABCDE")));
    }

    #[test]
    fn error_notifies_without_mutation() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        store.subscribe(move |_| *seen.borrow_mut() += 1);

        let before = store.snapshot();
        let changed = store.apply_server_event(
            ServerMessage::Error {
                error: ServerError { kind: "invalidJoin".into(), message: "No such game".into() },
            },
            &mut notes,
        );

        assert!(!changed);
        assert_eq!(store.snapshot(), before);
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(notes.iter().next().map(|n| n.payload.text()), Some("No such game"));
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            store.subscribe(move |_| order.borrow_mut().push(tag));
        }

        store.apply_server_event(
            ServerMessage::Welcome { player_id: PlayerId::new("P1"), message: None },
            &mut notes,
        );

        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribed_listener_not_called() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let id = store.subscribe(move |_| *seen.borrow_mut() += 1);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.apply_server_event(
            ServerMessage::Welcome { player_id: PlayerId::new("P1"), message: None },
            &mut notes,
        );

        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn listener_sees_post_mutation_state() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        store.subscribe(move |change| *sink.borrow_mut() = Some(change.guess_count()));

        store.apply_server_event(
            ServerMessage::GameUpdate {
                solution: None,
                board_state: board("P2", &["CRANE"], GameStatus::InProgress),
            },
            &mut notes,
        );

        assert_eq!(*seen.borrow(), Some(1));
    }

    #[test]
    fn game_update_replaces_keyboard() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        let mut first = board("P2", &["CRANE"], GameStatus::InProgress);
        first.keyboard_status = KeyboardStatus::from([('C', LetterColor::Gray), ('Q', LetterColor::Green)]);
        store.apply_server_event(
            ServerMessage::GameUpdate { solution: None, board_state: first },
            &mut notes,
        );

        let mut second = board("P1", &["CRANE", "SLATE"], GameStatus::InProgress);
        second.keyboard_status = KeyboardStatus::from([('C', LetterColor::Gray)]);
        store.apply_server_event(
            ServerMessage::GameUpdate { solution: None, board_state: second.clone() },
            &mut notes,
        );

        assert_eq!(store.game(), Some(&MatchState::from_board(second, None)));
    }

    #[test]
    fn teardown_keeps_player_id() {
        let mut store = GameStateStore::new();
        let mut notes = NotificationQueue::new();
        store.apply_server_event(
            ServerMessage::Welcome { player_id: PlayerId::new("P1"), message: None },
            &mut notes,
        );
        store.apply_server_event(
            ServerMessage::Created { game_id: GameId::new("ABCDE"), game_status: GameStatus::Waiting },
            &mut notes,
        );

        store.teardown();

        assert_eq!(store.session().player_id, Some(PlayerId::new("P1")));
        assert_eq!(store.session().game_id, None);
        assert!(store.game().is_none());
    }
}
