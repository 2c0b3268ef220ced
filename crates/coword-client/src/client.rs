//! Client facade.
//!
//! [`Client`] wires the connection, store, input controller and notification
//! queue together behind one entrypoint, [`Client::handle`]. Each event runs to
//! completion and yields the actions the caller must execute, in order.

use coword_proto::{ClientMessage, GameId};

use crate::{
    config::ClientConfig,
    connection::{ConnectionAction, ConnectionManager, ConnectionState},
    error::ClientError,
    event::{ClientAction, ClientEvent, Timer},
    input::GuessInputController,
    notification::{Notification, NotificationId, NotificationPayload, NotificationQueue},
    store::{GameStateStore, MatchState, Session},
};

/// Shown when a join code is not alphanumeric.
pub const INVALID_GAME_CODE_MESSAGE: &str = "Invalid game code";

/// Everything a renderer needs, copied out of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientView {
    /// Connection readiness.
    pub connection: ConnectionState,
    /// Session ids.
    pub session: Session,
    /// Current match, if any.
    pub game: Option<MatchState>,
    /// Letters typed but not yet accepted.
    pub buffer: String,
    /// Visible notifications, oldest first.
    pub notifications: Vec<Notification>,
}

/// Game client state machine.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    connection: ConnectionManager,
    store: GameStateStore,
    input: GuessInputController,
    notifications: NotificationQueue,
}

impl Client {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// - `ClientError::Config` if the configuration is invalid
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut store = GameStateStore::new();
        let input = GuessInputController::attach(&mut store);

        Ok(Self {
            connection: ConnectionManager::new(config.connection.clone()),
            config,
            store,
            input,
            notifications: NotificationQueue::new(),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connection readiness.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Connection state machine.
    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Session and match state.
    pub fn store(&self) -> &GameStateStore {
        &self.store
    }

    /// Letters typed but not yet accepted.
    pub fn buffer(&self) -> String {
        self.input.buffer()
    }

    /// Visible notifications.
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Copy of everything visible.
    pub fn view(&self) -> ClientView {
        let snapshot = self.store.snapshot();
        ClientView {
            connection: self.connection.state(),
            session: snapshot.session,
            game: snapshot.game,
            buffer: self.input.buffer(),
            notifications: self.notifications.iter().cloned().collect(),
        }
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: ClientEvent) -> Vec<ClientAction> {
        let actions = match event {
            ClientEvent::Connect => convert(self.connection.connect()),
            ClientEvent::Disconnect => self.handle_disconnect(),
            ClientEvent::SocketOpened(socket) => {
                convert(self.connection.on_open(socket, self.store.session()))
            },
            ClientEvent::FrameReceived { socket, text } => {
                if let Some(message) = self.connection.on_frame(socket, &text) {
                    self.store.apply_server_event(message, &mut self.notifications);
                }
                vec![]
            },
            ClientEvent::SocketClosed(socket) => {
                convert(self.connection.on_close(socket, &mut self.notifications))
            },
            ClientEvent::TimerFired(Timer::Retry(timer)) => {
                convert(self.connection.on_retry_timer(timer))
            },
            ClientEvent::TimerFired(Timer::Dismiss(id)) => {
                self.notifications.dismiss(id);
                vec![]
            },
            ClientEvent::Key(key) => convert(self.input.handle_key(
                key,
                &self.store,
                &mut self.connection,
                &mut self.notifications,
            )),
            ClientEvent::CreateGame => self.send(&ClientMessage::CreateGame),
            ClientEvent::JoinGame { game_id } => self.handle_join(game_id),
            ClientEvent::NewGame => self.send(&ClientMessage::NewGame),
            ClientEvent::LeaveGame => self.handle_leave(),
            ClientEvent::Dismiss(id) => self.handle_dismiss(id),
        };

        self.finish(actions)
    }

    /// Raise a local notification, e.g. for a command the user mistyped.
    pub fn notify(&mut self, text: impl Into<String>) -> Vec<ClientAction> {
        self.notifications.enqueue(NotificationPayload::message(text));
        self.finish(vec![])
    }

    /// Append dismiss timers for fresh notifications, then a render.
    fn finish(&mut self, mut actions: Vec<ClientAction>) -> Vec<ClientAction> {
        let ttl = self.config.notification_ttl;
        actions.extend(
            self.notifications
                .take_fresh()
                .into_iter()
                .map(|id| ClientAction::ScheduleTimer { timer: Timer::Dismiss(id), after: ttl }),
        );
        actions.push(ClientAction::Render);
        actions
    }

    fn send(&mut self, message: &ClientMessage) -> Vec<ClientAction> {
        convert(self.connection.send(message, &mut self.notifications))
    }

    fn handle_join(&mut self, game_id: GameId) -> Vec<ClientAction> {
        if !game_id.is_well_formed() {
            tracing::debug!(%game_id, "rejecting malformed game code");
            self.notifications.enqueue(NotificationPayload::message(INVALID_GAME_CODE_MESSAGE));
            return vec![];
        }
        self.send(&ClientMessage::JoinGame { game_id })
    }

    fn handle_leave(&mut self) -> Vec<ClientAction> {
        let actions = self.send(&ClientMessage::DisconnectPlayer);
        self.store.teardown();
        actions
    }

    fn handle_disconnect(&mut self) -> Vec<ClientAction> {
        let mut actions = Vec::new();

        if self.store.session().game_id.is_some() {
            match self.connection.try_send(&ClientMessage::DisconnectPlayer) {
                Ok(action) => actions.push(action.into()),
                Err(e) => tracing::debug!(error = %e, "skipping leave notice"),
            }
        }

        self.store.teardown();
        actions.extend(convert(self.connection.disconnect()));
        actions
    }

    fn handle_dismiss(&mut self, id: NotificationId) -> Vec<ClientAction> {
        if self.notifications.dismiss(id) {
            vec![ClientAction::CancelTimer(Timer::Dismiss(id))]
        } else {
            vec![]
        }
    }
}

fn convert(actions: Vec<ConnectionAction>) -> Vec<ClientAction> {
    actions.into_iter().map(ClientAction::from).collect()
}
